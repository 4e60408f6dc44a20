//! Driving port for post and tag reads.
use async_trait::async_trait;

use crate::domain::{Error, Post, PostId, Tag, TagId, UserId};

/// Read-side use cases exposed to inbound adapters.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PostQuery: Send + Sync {
    /// Fetch a single post.
    async fn get_post(&self, post_id: &PostId) -> Result<Post, Error>;

    /// Every post connected to any of `tag_ids`, each post listed once.
    ///
    /// No ownership filter is applied: tags of any user may be queried.
    async fn posts_by_tags(&self, tag_ids: &[TagId]) -> Result<Vec<Post>, Error>;

    /// Every tag owned by `owner_id`.
    async fn tags_for_owner(&self, owner_id: &UserId) -> Result<Vec<Tag>, Error>;
}

/// Fixture query returning empty results.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixturePostQuery;

#[async_trait]
impl PostQuery for FixturePostQuery {
    async fn get_post(&self, post_id: &PostId) -> Result<Post, Error> {
        Err(Error::not_found(format!("post not found: {post_id}")))
    }

    async fn posts_by_tags(&self, _tag_ids: &[TagId]) -> Result<Vec<Post>, Error> {
        Ok(Vec::new())
    }

    async fn tags_for_owner(&self, _owner_id: &UserId) -> Result<Vec<Tag>, Error> {
        Ok(Vec::new())
    }
}
