//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (`TagRepository`, `PostRepository`,
//! `UserPermissionsRepository`, `TagCleanupQueue`) are implemented by outbound
//! adapters. Driving ports (`PostCommand`, `PostQuery`) are implemented by the
//! domain services and consumed by inbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod post_command;
mod post_query;
mod post_repository;
mod tag_cleanup_queue;
mod tag_repository;
mod user_permissions_repository;

#[cfg(test)]
pub use post_command::MockPostCommand;
pub use post_command::{
    CreatePostRequest, DeletePostRequest, FixturePostCommand, PostCommand, UpdatePostRequest,
};
#[cfg(test)]
pub use post_query::MockPostQuery;
pub use post_query::{FixturePostQuery, PostQuery};
#[cfg(test)]
pub use post_repository::MockPostRepository;
pub use post_repository::{PostRepository, PostRepositoryError};
#[cfg(test)]
pub use tag_cleanup_queue::MockTagCleanupQueue;
pub use tag_cleanup_queue::{
    CleanupReason, DiscardingTagCleanupQueue, TagCleanupQueue, TagCleanupQueueError,
    TagCleanupRequest,
};
#[cfg(test)]
pub use tag_repository::MockTagRepository;
pub use tag_repository::{TagRepository, TagRepositoryError};
#[cfg(test)]
pub use user_permissions_repository::MockUserPermissionsRepository;
pub use user_permissions_repository::{
    FixtureUserPermissionsRepository, UserPermissionsError, UserPermissionsRepository,
};
