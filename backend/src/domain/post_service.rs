//! Post service keeping the post/tag relation consistent.
//!
//! Mutations resolve tag names to records owned by the post author, write the
//! post together with its relation changes, and hand detached tags to the
//! cleanup queue. Cleanup never influences the result returned to callers.

use std::sync::Arc;

use async_trait::async_trait;
use futures_util::future::{join_all, try_join_all};
use tracing::{info, warn};

use crate::domain::ports::{
    CleanupReason, CreatePostRequest, DeletePostRequest, PostCommand, PostQuery, PostRepository,
    PostRepositoryError, TagCleanupQueue, TagCleanupRequest, TagRepository, TagRepositoryError,
    UpdatePostRequest,
};
use crate::domain::tag_delta::{TagDelta, unique_names};
use crate::domain::tag_provisioner::TagProvisioner;
use crate::domain::{
    Error, NewPost, Post, PostId, PostPatch, Tag, TagId, UserId, authorize_post_deletion,
    authorize_post_update, dedupe_by_id,
};

/// Provision-and-write rounds before a tag deleted under the write is
/// reported as an error.
const TAG_WRITE_ATTEMPTS: u32 = 3;

/// Tunables for [`PostService`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PostServiceOptions {
    /// After creating a post, also connect it from each tag's side.
    pub mirror_tag_links: bool,
}

impl Default for PostServiceOptions {
    fn default() -> Self {
        Self {
            mirror_tag_links: true,
        }
    }
}

/// Post service implementing the driving ports.
pub struct PostService<P, T, Q> {
    posts: Arc<P>,
    tags: Arc<T>,
    cleanup: Arc<Q>,
    provisioner: TagProvisioner<T>,
    options: PostServiceOptions,
}

impl<P, T, Q> Clone for PostService<P, T, Q> {
    fn clone(&self) -> Self {
        Self {
            posts: Arc::clone(&self.posts),
            tags: Arc::clone(&self.tags),
            cleanup: Arc::clone(&self.cleanup),
            provisioner: self.provisioner.clone(),
            options: self.options,
        }
    }
}

impl<P, T, Q> PostService<P, T, Q> {
    /// Create a service with default options.
    pub fn new(posts: Arc<P>, tags: Arc<T>, cleanup: Arc<Q>) -> Self {
        Self::with_options(posts, tags, cleanup, PostServiceOptions::default())
    }

    /// Create a service with explicit options.
    pub fn with_options(
        posts: Arc<P>,
        tags: Arc<T>,
        cleanup: Arc<Q>,
        options: PostServiceOptions,
    ) -> Self {
        Self {
            provisioner: TagProvisioner::new(Arc::clone(&tags)),
            posts,
            tags,
            cleanup,
            options,
        }
    }
}

impl<P, T, Q> PostService<P, T, Q>
where
    P: PostRepository,
    T: TagRepository + 'static,
    Q: TagCleanupQueue,
{
    fn map_post_error(error: PostRepositoryError) -> Error {
        match error {
            PostRepositoryError::Connection { message } => {
                Error::service_unavailable(format!("post repository unavailable: {message}"))
            }
            PostRepositoryError::Query { message } => {
                Error::internal(format!("post repository error: {message}"))
            }
            PostRepositoryError::NotFound { post_id } => {
                Error::not_found(format!("post not found: {post_id}"))
            }
            PostRepositoryError::UnknownTag { tag_id } => {
                Error::internal(format!("tag removed while connecting: {tag_id}"))
            }
        }
    }

    fn map_tag_error(error: TagRepositoryError) -> Error {
        match error {
            TagRepositoryError::Connection { message } => {
                Error::service_unavailable(format!("tag repository unavailable: {message}"))
            }
            TagRepositoryError::Query { message } => {
                Error::internal(format!("tag repository error: {message}"))
            }
            TagRepositoryError::Duplicate { name } => {
                Error::internal(format!("unexpected tag name conflict: {name}"))
            }
            TagRepositoryError::NotFound { tag_id } => {
                Error::not_found(format!("tag not found: {tag_id}"))
            }
        }
    }

    async fn load_post(&self, post_id: &PostId) -> Result<Post, Error> {
        self.posts
            .find_by_id(post_id)
            .await
            .map_err(Self::map_post_error)?
            .ok_or_else(|| Error::not_found(format!("post not found: {post_id}")))
    }

    /// Connect the post from each tag's side on a background task.
    /// Failures are only logged.
    fn spawn_mirror_links(&self, post: &Post) {
        if !self.options.mirror_tag_links || post.tags.is_empty() {
            return;
        }
        let tags = Arc::clone(&self.tags);
        let post_id = post.id;
        let tag_ids = post.tag_ids();
        tokio::spawn(async move {
            let results =
                join_all(tag_ids.iter().map(|tag_id| tags.attach_post(tag_id, &post_id))).await;
            for (tag_id, result) in tag_ids.iter().zip(results) {
                if let Err(err) = result {
                    warn!(
                        post_id = %post_id,
                        tag_id = %tag_id,
                        error = %err,
                        "failed to mirror tag link"
                    );
                }
            }
        });
    }

    /// Queue `tag_ids` for orphan collection. Failures are only logged.
    async fn schedule_cleanup(&self, post_id: PostId, tag_ids: Vec<TagId>, reason: CleanupReason) {
        if tag_ids.is_empty() {
            return;
        }
        let count = tag_ids.len();
        let request = TagCleanupRequest {
            post_id,
            tag_ids,
            reason,
        };
        if let Err(err) = self.cleanup.enqueue(request).await {
            warn!(
                post_id = %post_id,
                reason = reason.as_str(),
                tags = count,
                error = %err,
                "failed to enqueue tag cleanup"
            );
        }
    }
}

#[async_trait]
impl<P, T, Q> PostCommand for PostService<P, T, Q>
where
    P: PostRepository,
    T: TagRepository + 'static,
    Q: TagCleanupQueue,
{
    async fn create_post(&self, request: CreatePostRequest) -> Result<Post, Error> {
        let CreatePostRequest {
            owner_id,
            content,
            tag_names,
        } = request;
        let desired = unique_names(tag_names);

        let mut attempt = 1;
        let (post, created_tags) = loop {
            let provisioned = self
                .provisioner
                .provision_for_owner(&owner_id, &desired)
                .await
                .map_err(Self::map_tag_error)?;
            let new_post = NewPost {
                owner_id,
                content: content.clone(),
                tag_ids: provisioned.ids(),
            };
            match self.posts.create(&new_post).await {
                Ok(post) => break (post, provisioned.created.len()),
                Err(PostRepositoryError::UnknownTag { tag_id }) if attempt < TAG_WRITE_ATTEMPTS => {
                    warn!(
                        owner_id = %owner_id,
                        tag_id = %tag_id,
                        attempt,
                        "tag vanished before connect; provisioning again"
                    );
                    attempt += 1;
                }
                Err(err) => return Err(Self::map_post_error(err)),
            }
        };
        info!(
            post_id = %post.id,
            owner_id = %owner_id,
            tags = post.tags.len(),
            created_tags,
            "post created"
        );

        self.spawn_mirror_links(&post);
        Ok(post)
    }

    async fn update_post(&self, request: UpdatePostRequest) -> Result<Post, Error> {
        let UpdatePostRequest {
            post_id,
            requester_id,
            content,
            tag_names,
        } = request;
        let current = self.load_post(&post_id).await?;
        authorize_post_update(&requester_id, &current.owner_id)?;

        let delta = tag_names.map(|names| TagDelta::between(&current.tags, &unique_names(names)));
        let added = delta.as_ref().map_or(&[][..], |delta| delta.added.as_slice());
        let disconnect: Vec<TagId> = delta
            .as_ref()
            .map(|delta| delta.removed.iter().map(|tag| tag.id).collect())
            .unwrap_or_default();

        let mut attempt = 1;
        let (updated, patch) = loop {
            let provisioned = self
                .provisioner
                .provision_for_owner(&current.owner_id, added)
                .await
                .map_err(Self::map_tag_error)?;
            let patch = PostPatch {
                content: content.clone(),
                connect: provisioned.ids(),
                disconnect: disconnect.clone(),
            };
            if patch.content.is_empty() && patch.connect.is_empty() && disconnect.is_empty() {
                return Ok(current);
            }
            match self.posts.update(&post_id, &patch).await {
                Ok(updated) => break (updated, patch),
                Err(PostRepositoryError::UnknownTag { tag_id }) if attempt < TAG_WRITE_ATTEMPTS => {
                    warn!(
                        post_id = %post_id,
                        tag_id = %tag_id,
                        attempt,
                        "tag vanished before connect; provisioning again"
                    );
                    attempt += 1;
                }
                Err(err) => return Err(Self::map_post_error(err)),
            }
        };
        info!(
            post_id = %post_id,
            connected = patch.connect.len(),
            disconnected = patch.disconnect.len(),
            "post updated"
        );

        self.schedule_cleanup(post_id, patch.disconnect, CleanupReason::PostUpdated)
            .await;
        Ok(updated)
    }

    async fn delete_post(&self, request: DeletePostRequest) -> Result<Post, Error> {
        let DeletePostRequest { post_id, requester } = request;
        let post = self.load_post(&post_id).await?;
        authorize_post_deletion(&requester, &post.owner_id)?;

        let deleted = self
            .posts
            .delete(&post_id)
            .await
            .map_err(Self::map_post_error)?;
        if !deleted {
            return Err(Error::not_found(format!("post not found: {post_id}")));
        }
        info!(post_id = %post_id, requester_id = %requester.id, "post deleted");

        self.schedule_cleanup(post_id, post.tag_ids(), CleanupReason::PostDeleted)
            .await;
        Ok(post)
    }
}

#[async_trait]
impl<P, T, Q> PostQuery for PostService<P, T, Q>
where
    P: PostRepository,
    T: TagRepository + 'static,
    Q: TagCleanupQueue,
{
    async fn get_post(&self, post_id: &PostId) -> Result<Post, Error> {
        self.load_post(post_id).await
    }

    async fn posts_by_tags(&self, tag_ids: &[TagId]) -> Result<Vec<Post>, Error> {
        let batches = try_join_all(tag_ids.iter().map(|tag_id| self.posts.find_by_tag(tag_id)))
            .await
            .map_err(Self::map_post_error)?;
        Ok(dedupe_by_id(batches.into_iter().flatten()))
    }

    async fn tags_for_owner(&self, owner_id: &UserId) -> Result<Vec<Tag>, Error> {
        self.tags
            .find_by_owner(owner_id)
            .await
            .map_err(Self::map_tag_error)
    }
}

#[cfg(test)]
#[path = "post_service_tests.rs"]
mod tests;
