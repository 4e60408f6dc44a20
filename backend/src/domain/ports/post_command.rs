//! Driving port for post mutations that keep the post/tag relation consistent.
use async_trait::async_trait;
use chrono::Utc;

use crate::domain::{
    Error, Post, PostContent, PostContentPatch, PostId, Requester, TagName, UserId,
};

/// Create a post owned by `owner_id`, tagged with `tag_names`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatePostRequest {
    /// Authenticated author.
    pub owner_id: UserId,
    /// Title and body.
    pub content: PostContent,
    /// Desired tag names; may be empty.
    pub tag_names: Vec<TagName>,
}

/// Edit a post's fields and, optionally, its tag set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdatePostRequest {
    /// Post to edit.
    pub post_id: PostId,
    /// Authenticated caller; must own the post.
    pub requester_id: UserId,
    /// Field changes.
    pub content: PostContentPatch,
    /// Desired tag names. `None` leaves tags untouched; an empty list removes
    /// every tag.
    pub tag_names: Option<Vec<TagName>>,
}

/// Delete a post on behalf of `requester`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletePostRequest {
    /// Post to delete.
    pub post_id: PostId,
    /// Authenticated caller with resolved permissions.
    pub requester: Requester,
}

/// Post mutations exposed to inbound adapters.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PostCommand: Send + Sync {
    /// Provision tags, then create the post connected to them.
    async fn create_post(&self, request: CreatePostRequest) -> Result<Post, Error>;

    /// Reconcile the post's tags with the desired names and apply field edits.
    async fn update_post(&self, request: UpdatePostRequest) -> Result<Post, Error>;

    /// Authorize, delete the post, then schedule collection of its former tags.
    async fn delete_post(&self, request: DeletePostRequest) -> Result<Post, Error>;
}

/// Fixture command that echoes requests back as untagged posts.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixturePostCommand;

#[async_trait]
impl PostCommand for FixturePostCommand {
    async fn create_post(&self, request: CreatePostRequest) -> Result<Post, Error> {
        let now = Utc::now();
        Ok(Post {
            id: PostId::random(),
            owner_id: request.owner_id,
            content: request.content,
            tags: Vec::new(),
            created_at: now,
            updated_at: now,
        })
    }

    async fn update_post(&self, request: UpdatePostRequest) -> Result<Post, Error> {
        Err(Error::not_found(format!("post not found: {}", request.post_id)))
    }

    async fn delete_post(&self, request: DeletePostRequest) -> Result<Post, Error> {
        Err(Error::not_found(format!("post not found: {}", request.post_id)))
    }
}
