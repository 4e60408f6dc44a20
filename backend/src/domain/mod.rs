//! Domain primitives, services, and ports.
//!
//! Purpose: model posts, user-scoped tags, and the rules that keep the
//! many-to-many relation between them consistent. Nothing here depends on a
//! transport or a concrete store; adapters plug in through [`ports`].
//!
//! Public surface:
//! - Entities: [`Post`], [`Tag`], [`UserId`], [`Requester`] and their
//!   validated value types.
//! - [`Error`] / [`ErrorCode`]: API error payload.
//! - [`PostService`]: implements the `PostCommand` and `PostQuery` ports.
//! - [`TagCleanupWorker`]: background orphan-tag collection.

pub mod authorization;
pub mod error;
pub mod keyed_lock;
pub mod orphan_collector;
pub mod ports;
pub mod post;
pub mod post_service;
pub mod set_ops;
pub mod tag;
pub mod tag_cleanup_worker;
pub mod tag_delta;
pub mod tag_provisioner;
pub mod user;

pub use self::authorization::{
    POST_DELETE_PERMISSIONS, authorize_post_deletion, authorize_post_update,
    require_any_permission,
};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::keyed_lock::{KeyGuard, KeyedLocks};
pub use self::orphan_collector::{CollectionOutcome, OrphanTagCollector};
pub use self::post::{
    NewPost, POST_TITLE_MAX, Post, PostContent, PostContentPatch, PostId, PostPatch,
    PostValidationError,
};
pub use self::post_service::{PostService, PostServiceOptions};
pub use self::set_ops::{Identified, Partitioned, dedupe_by_id, partition};
pub use self::tag::{
    NewTag, TAG_NAME_MAX, Tag, TagId, TagName, TagSummary, TagUsage, TagValidationError,
};
pub use self::tag_cleanup_worker::{
    CleanupReport, CleanupRetryPolicy, CleanupSleeper, TagCleanupWorker, TokioSleeper,
};
pub use self::tag_delta::{TagDelta, unique_names};
pub use self::tag_provisioner::{ProvisionedTags, TagProvisioner};
pub use self::user::{Permission, Requester, UserId, UserValidationError};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use blog_backend::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
