//! Port for post persistence, including the post side of the tag relation.
use async_trait::async_trait;

use crate::domain::{NewPost, Post, PostId, PostPatch, TagId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by post repository adapters.
    pub enum PostRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "post repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "post repository query failed: {message}",
        /// The referenced post does not exist.
        NotFound { post_id: String } =>
            "post not found: {post_id}",
        /// A tag to connect was deleted before the write.
        UnknownTag { tag_id: String } =>
            "cannot connect unknown tag {tag_id}",
    }
}

/// Port for post storage.
///
/// Relation writes for a single post (`create` with `tag_ids`, `update` with
/// `connect`/`disconnect`) are atomic with the post write itself.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Fetch a post with its tags projected to `{id, name}`.
    async fn find_by_id(&self, post_id: &PostId) -> Result<Option<Post>, PostRepositoryError>;

    /// Every post connected to `tag_id`. Unknown tags yield an empty list.
    async fn find_by_tag(&self, tag_id: &TagId) -> Result<Vec<Post>, PostRepositoryError>;

    /// Insert a post, connecting it to `post.tag_ids` in the same write.
    ///
    /// Fails with [`PostRepositoryError::UnknownTag`] without writing anything
    /// when one of the tags no longer exists; `update` does the same for
    /// `patch.connect`.
    async fn create(&self, post: &NewPost) -> Result<Post, PostRepositoryError>;

    /// Apply field changes and relation connect/disconnect lists in one write.
    async fn update(&self, post_id: &PostId, patch: &PostPatch)
        -> Result<Post, PostRepositoryError>;

    /// Delete a post and its relation rows.
    ///
    /// Returns `Ok(false)` if the post did not exist.
    async fn delete(&self, post_id: &PostId) -> Result<bool, PostRepositoryError>;
}
