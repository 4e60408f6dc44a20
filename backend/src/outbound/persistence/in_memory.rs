//! Process-local store implementing every persistence port.
//!
//! Posts own the relation: each post record lists its tag identifiers and tag
//! usage is derived by scanning posts. Records keep insertion order so reads
//! are deterministic.

use std::collections::{BTreeSet, HashMap};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::ports::{
    PostRepository, PostRepositoryError, TagRepository, TagRepositoryError, UserPermissionsError,
    UserPermissionsRepository,
};
use crate::domain::{
    NewPost, NewTag, Permission, Post, PostContent, PostId, PostPatch, Tag, TagId, TagName,
    TagUsage, UserId,
};

const POISONED: &str = "in-memory store lock poisoned";

#[derive(Debug, Clone)]
struct PostRecord {
    id: PostId,
    owner_id: UserId,
    content: PostContent,
    tag_ids: Vec<TagId>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct StoreState {
    tags: Vec<Tag>,
    posts: Vec<PostRecord>,
    permissions: HashMap<UserId, BTreeSet<Permission>>,
}

impl StoreState {
    fn tag(&self, tag_id: &TagId) -> Option<&Tag> {
        self.tags.iter().find(|tag| tag.id == *tag_id)
    }

    fn post_mut(&mut self, post_id: &PostId) -> Option<&mut PostRecord> {
        self.posts.iter_mut().find(|post| post.id == *post_id)
    }

    fn project(&self, record: &PostRecord) -> Post {
        Post {
            id: record.id,
            owner_id: record.owner_id,
            content: record.content.clone(),
            tags: record
                .tag_ids
                .iter()
                .filter_map(|tag_id| self.tag(tag_id).map(Tag::summary))
                .collect(),
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }

    fn missing_tag(&self, tag_ids: &[TagId]) -> Option<TagId> {
        tag_ids
            .iter()
            .find(|tag_id| self.tag(tag_id).is_none())
            .copied()
    }
}

/// Shared in-memory store.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    state: Mutex<StoreState>,
}

impl InMemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the permissions the authentication collaborator grants a user.
    pub fn seed_user(
        &self,
        user_id: UserId,
        permissions: impl IntoIterator<Item = Permission>,
    ) -> Result<(), UserPermissionsError> {
        let mut state = self.permissions_state()?;
        state
            .permissions
            .insert(user_id, permissions.into_iter().collect());
        Ok(())
    }

    /// Total number of stored tags across all owners.
    pub fn tag_count(&self) -> Result<usize, TagRepositoryError> {
        Ok(self.tags_state()?.tags.len())
    }

    fn tags_state(&self) -> Result<MutexGuard<'_, StoreState>, TagRepositoryError> {
        self.state
            .lock()
            .map_err(|_| TagRepositoryError::connection(POISONED))
    }

    fn posts_state(&self) -> Result<MutexGuard<'_, StoreState>, PostRepositoryError> {
        self.state
            .lock()
            .map_err(|_| PostRepositoryError::connection(POISONED))
    }

    fn permissions_state(&self) -> Result<MutexGuard<'_, StoreState>, UserPermissionsError> {
        self.state
            .lock()
            .map_err(|_| UserPermissionsError::connection(POISONED))
    }
}

#[async_trait]
impl TagRepository for InMemoryStore {
    async fn find_by_owner(&self, owner_id: &UserId) -> Result<Vec<Tag>, TagRepositoryError> {
        let state = self.tags_state()?;
        Ok(state
            .tags
            .iter()
            .filter(|tag| tag.owner_id == *owner_id)
            .cloned()
            .collect())
    }

    async fn find_by_owner_and_name(
        &self,
        owner_id: &UserId,
        name: &TagName,
    ) -> Result<Option<Tag>, TagRepositoryError> {
        let state = self.tags_state()?;
        Ok(state
            .tags
            .iter()
            .find(|tag| tag.owner_id == *owner_id && tag.name == *name)
            .cloned())
    }

    async fn find_usage(&self, tag_id: &TagId) -> Result<Option<TagUsage>, TagRepositoryError> {
        let state = self.tags_state()?;
        Ok(state.tag(tag_id).map(|tag| TagUsage {
            tag: tag.clone(),
            post_ids: state
                .posts
                .iter()
                .filter(|post| post.tag_ids.contains(tag_id))
                .map(|post| post.id)
                .collect(),
        }))
    }

    async fn create(&self, new_tag: &NewTag) -> Result<Tag, TagRepositoryError> {
        let mut state = self.tags_state()?;
        if state
            .tags
            .iter()
            .any(|tag| tag.owner_id == new_tag.owner_id && tag.name == new_tag.name)
        {
            return Err(TagRepositoryError::duplicate(new_tag.name.to_string()));
        }
        let tag = Tag {
            id: TagId::random(),
            name: new_tag.name.clone(),
            owner_id: new_tag.owner_id,
        };
        state.tags.push(tag.clone());
        Ok(tag)
    }

    async fn attach_post(
        &self,
        tag_id: &TagId,
        post_id: &PostId,
    ) -> Result<(), TagRepositoryError> {
        let mut state = self.tags_state()?;
        if state.tag(tag_id).is_none() {
            return Err(TagRepositoryError::not_found(tag_id.to_string()));
        }
        let post = state
            .post_mut(post_id)
            .ok_or_else(|| TagRepositoryError::query(format!("post not found: {post_id}")))?;
        if !post.tag_ids.contains(tag_id) {
            post.tag_ids.push(*tag_id);
        }
        Ok(())
    }

    async fn delete_if_unreferenced(&self, tag_id: &TagId) -> Result<bool, TagRepositoryError> {
        let mut state = self.tags_state()?;
        if state.posts.iter().any(|post| post.tag_ids.contains(tag_id)) {
            return Ok(false);
        }
        let before = state.tags.len();
        state.tags.retain(|tag| tag.id != *tag_id);
        Ok(state.tags.len() < before)
    }
}

#[async_trait]
impl PostRepository for InMemoryStore {
    async fn find_by_id(&self, post_id: &PostId) -> Result<Option<Post>, PostRepositoryError> {
        let state = self.posts_state()?;
        Ok(state
            .posts
            .iter()
            .find(|post| post.id == *post_id)
            .map(|record| state.project(record)))
    }

    async fn find_by_tag(&self, tag_id: &TagId) -> Result<Vec<Post>, PostRepositoryError> {
        let state = self.posts_state()?;
        Ok(state
            .posts
            .iter()
            .filter(|post| post.tag_ids.contains(tag_id))
            .map(|record| state.project(record))
            .collect())
    }

    async fn create(&self, new_post: &NewPost) -> Result<Post, PostRepositoryError> {
        let mut state = self.posts_state()?;
        if let Some(missing) = state.missing_tag(&new_post.tag_ids) {
            return Err(PostRepositoryError::unknown_tag(missing.to_string()));
        }
        let mut tag_ids: Vec<TagId> = Vec::with_capacity(new_post.tag_ids.len());
        for tag_id in &new_post.tag_ids {
            if !tag_ids.contains(tag_id) {
                tag_ids.push(*tag_id);
            }
        }
        let now = Utc::now();
        let record = PostRecord {
            id: PostId::random(),
            owner_id: new_post.owner_id,
            content: new_post.content.clone(),
            tag_ids,
            created_at: now,
            updated_at: now,
        };
        let post = state.project(&record);
        state.posts.push(record);
        Ok(post)
    }

    async fn update(
        &self,
        post_id: &PostId,
        patch: &PostPatch,
    ) -> Result<Post, PostRepositoryError> {
        let mut state = self.posts_state()?;
        if let Some(missing) = state.missing_tag(&patch.connect) {
            return Err(PostRepositoryError::unknown_tag(missing.to_string()));
        }
        let record = state
            .post_mut(post_id)
            .ok_or_else(|| PostRepositoryError::not_found(post_id.to_string()))?;
        record.content = record.content.apply(&patch.content);
        record
            .tag_ids
            .retain(|tag_id| !patch.disconnect.contains(tag_id));
        for tag_id in &patch.connect {
            if !record.tag_ids.contains(tag_id) {
                record.tag_ids.push(*tag_id);
            }
        }
        record.updated_at = Utc::now();
        let snapshot = record.clone();
        Ok(state.project(&snapshot))
    }

    async fn delete(&self, post_id: &PostId) -> Result<bool, PostRepositoryError> {
        let mut state = self.posts_state()?;
        let before = state.posts.len();
        state.posts.retain(|post| post.id != *post_id);
        Ok(state.posts.len() < before)
    }
}

#[async_trait]
impl UserPermissionsRepository for InMemoryStore {
    async fn find_permissions(
        &self,
        user_id: &UserId,
    ) -> Result<Option<BTreeSet<Permission>>, UserPermissionsError> {
        let state = self.permissions_state()?;
        Ok(state.permissions.get(user_id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn store() -> InMemoryStore {
        InMemoryStore::new()
    }

    fn name(raw: &str) -> TagName {
        TagName::new(raw).expect("valid tag name")
    }

    fn content() -> PostContent {
        PostContent::new("Hello", "world").expect("valid content")
    }

    async fn tag_for(store: &InMemoryStore, owner_id: UserId, raw: &str) -> Tag {
        TagRepository::create(
            store,
            &NewTag {
                name: name(raw),
                owner_id,
            },
        )
        .await
        .expect("tag created")
    }

    #[rstest]
    #[tokio::test]
    async fn duplicate_owner_and_name_is_rejected(store: InMemoryStore) {
        let owner = UserId::random();
        tag_for(&store, owner, "go").await;

        let error = TagRepository::create(
            &store,
            &NewTag {
                name: name("go"),
                owner_id: owner,
            },
        )
        .await
        .expect_err("duplicate rejected");

        assert_eq!(error, TagRepositoryError::duplicate("go"));
    }

    #[rstest]
    #[tokio::test]
    async fn same_name_for_different_owners_is_allowed(store: InMemoryStore) {
        tag_for(&store, UserId::random(), "go").await;
        tag_for(&store, UserId::random(), "go").await;

        assert_eq!(store.tag_count().expect("count"), 2);
    }

    #[rstest]
    #[tokio::test]
    async fn usage_tracks_post_connections(store: InMemoryStore) {
        let owner = UserId::random();
        let go = tag_for(&store, owner, "go").await;
        let post = PostRepository::create(
            &store,
            &NewPost {
                owner_id: owner,
                content: content(),
                tag_ids: vec![go.id, go.id],
            },
        )
        .await
        .expect("post created");

        let usage = store
            .find_usage(&go.id)
            .await
            .expect("usage read")
            .expect("tag exists");
        assert_eq!(usage.post_ids, vec![post.id]);
        assert_eq!(post.tags, vec![go.summary()]);
    }

    #[rstest]
    #[tokio::test]
    async fn conditional_delete_keeps_referenced_tags(store: InMemoryStore) {
        let owner = UserId::random();
        let go = tag_for(&store, owner, "go").await;
        let post = PostRepository::create(
            &store,
            &NewPost {
                owner_id: owner,
                content: content(),
                tag_ids: vec![go.id],
            },
        )
        .await
        .expect("post created");

        assert!(!store.delete_if_unreferenced(&go.id).await.expect("delete"));

        PostRepository::delete(&store, &post.id)
            .await
            .expect("post deleted");
        assert!(store.delete_if_unreferenced(&go.id).await.expect("delete"));
        assert!(!store.delete_if_unreferenced(&go.id).await.expect("delete"));
    }

    #[rstest]
    #[tokio::test]
    async fn update_applies_connect_and_disconnect(store: InMemoryStore) {
        let owner = UserId::random();
        let go = tag_for(&store, owner, "go").await;
        let db = tag_for(&store, owner, "db").await;
        let post = PostRepository::create(
            &store,
            &NewPost {
                owner_id: owner,
                content: content(),
                tag_ids: vec![go.id],
            },
        )
        .await
        .expect("post created");

        let updated = PostRepository::update(
            &store,
            &post.id,
            &PostPatch {
                connect: vec![db.id],
                disconnect: vec![go.id],
                ..PostPatch::default()
            },
        )
        .await
        .expect("post updated");

        assert_eq!(updated.tags, vec![db.summary()]);
        assert_eq!(updated.content, post.content);
    }

    #[rstest]
    #[tokio::test]
    async fn connecting_unknown_tag_fails(store: InMemoryStore) {
        let error = PostRepository::create(
            &store,
            &NewPost {
                owner_id: UserId::random(),
                content: content(),
                tag_ids: vec![TagId::random()],
            },
        )
        .await
        .expect_err("unknown tag rejected");

        assert!(matches!(error, PostRepositoryError::UnknownTag { .. }));
    }

    #[rstest]
    #[tokio::test]
    async fn attach_post_is_idempotent(store: InMemoryStore) {
        let owner = UserId::random();
        let go = tag_for(&store, owner, "go").await;
        let post = PostRepository::create(
            &store,
            &NewPost {
                owner_id: owner,
                content: content(),
                tag_ids: vec![go.id],
            },
        )
        .await
        .expect("post created");

        store.attach_post(&go.id, &post.id).await.expect("attach");
        store.attach_post(&go.id, &post.id).await.expect("attach");

        let found = store
            .find_by_id(&post.id)
            .await
            .expect("read")
            .expect("post exists");
        assert_eq!(found.tag_ids(), vec![go.id]);
    }

    #[rstest]
    #[tokio::test]
    async fn seeded_permissions_are_returned(store: InMemoryStore) {
        let user = UserId::random();
        store
            .seed_user(user, [Permission::User, Permission::Admin])
            .expect("seeded");

        let permissions = store
            .find_permissions(&user)
            .await
            .expect("read")
            .expect("user known");
        assert!(permissions.contains(&Permission::Admin));
        assert_eq!(
            store
                .find_permissions(&UserId::random())
                .await
                .expect("read"),
            None
        );
    }
}
