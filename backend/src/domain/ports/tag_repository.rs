//! Port for tag persistence.
//!
//! Tags are user-scoped labels in a many-to-many relation with posts. The
//! relation itself is written through [`super::PostRepository`]; this port
//! covers tag records, their usage counts, and the conditional delete used by
//! orphan collection.

use async_trait::async_trait;

use crate::domain::{NewTag, PostId, Tag, TagId, TagName, TagUsage, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by tag repository adapters.
    pub enum TagRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "tag repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "tag repository query failed: {message}",
        /// The owner already has a tag with this name.
        Duplicate { name: String } =>
            "tag already exists for owner: {name}",
        /// The referenced tag does not exist.
        NotFound { tag_id: String } =>
            "tag not found: {tag_id}",
    }
}

impl TagRepositoryError {
    /// Whether repeating the call may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Connection { .. })
    }
}

/// Port for tag storage and lookup.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TagRepository: Send + Sync {
    /// Every tag owned by `owner_id`.
    async fn find_by_owner(&self, owner_id: &UserId) -> Result<Vec<Tag>, TagRepositoryError>;

    /// The owner's tag named `name`, if any.
    async fn find_by_owner_and_name(
        &self,
        owner_id: &UserId,
        name: &TagName,
    ) -> Result<Option<Tag>, TagRepositoryError>;

    /// The tag with the identifiers of every post referencing it.
    ///
    /// Returns `None` when the tag no longer exists.
    async fn find_usage(&self, tag_id: &TagId) -> Result<Option<TagUsage>, TagRepositoryError>;

    /// Insert a tag with no posts.
    ///
    /// Adapters that can detect an existing `(owner, name)` pair return
    /// [`TagRepositoryError::Duplicate`] instead of inserting a second row.
    async fn create(&self, tag: &NewTag) -> Result<Tag, TagRepositoryError>;

    /// Connect `post_id` to the tag from the tag side of the relation.
    ///
    /// Connecting an already connected post is a no-op.
    async fn attach_post(&self, tag_id: &TagId, post_id: &PostId)
        -> Result<(), TagRepositoryError>;

    /// Delete the tag only if no post references it.
    ///
    /// Returns `Ok(true)` when the tag was removed and `Ok(false)` when it is
    /// still referenced or already gone.
    async fn delete_if_unreferenced(&self, tag_id: &TagId) -> Result<bool, TagRepositoryError>;
}
