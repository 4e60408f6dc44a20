//! Resolve desired tag names into tag records, creating the missing ones.
//!
//! Names already owned by the user resolve to the existing record. Missing
//! names are created concurrently; each creation is serialized per
//! `(owner, name)` and re-checks the store under that lock, so concurrent
//! provisioning of the same new name yields a single tag. A store-level
//! duplicate rejection falls back to reading the winning record.

use std::sync::Arc;

use futures_util::future::try_join_all;
use tracing::{debug, info};

use crate::domain::ports::{TagRepository, TagRepositoryError};
use crate::domain::{KeyedLocks, NewTag, Tag, TagId, TagName, UserId, partition};

/// Tags resolved by [`TagProvisioner::provision`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProvisionedTags {
    /// Records for names the owner lacked when the call started, including
    /// ones another caller created concurrently.
    pub created: Vec<Tag>,
    /// Records the owner already had.
    pub existing: Vec<Tag>,
}

impl ProvisionedTags {
    /// Identifiers of the created tags followed by the existing ones.
    pub fn ids(&self) -> Vec<TagId> {
        self.created
            .iter()
            .chain(&self.existing)
            .map(|tag| tag.id)
            .collect()
    }
}

/// Creates-if-absent tags for one owner at a time.
pub struct TagProvisioner<T> {
    tags: Arc<T>,
    locks: Arc<KeyedLocks<(UserId, TagName)>>,
}

impl<T> Clone for TagProvisioner<T> {
    fn clone(&self) -> Self {
        Self {
            tags: Arc::clone(&self.tags),
            locks: Arc::clone(&self.locks),
        }
    }
}

impl<T> TagProvisioner<T> {
    /// Create a provisioner over the given repository.
    pub fn new(tags: Arc<T>) -> Self {
        Self {
            tags,
            locks: Arc::new(KeyedLocks::new()),
        }
    }
}

impl<T> TagProvisioner<T>
where
    T: TagRepository,
{
    /// Resolve `desired` against `existing` (the owner's current tags).
    ///
    /// Fails if any creation fails. Tags created by the same call before the
    /// failure are not rolled back; they stay as orphans until a later
    /// provisioning reuses them.
    pub async fn provision(
        &self,
        owner_id: &UserId,
        desired: &[TagName],
        existing: &[Tag],
    ) -> Result<ProvisionedTags, TagRepositoryError> {
        let split = partition(desired.iter(), existing, |name, tag| **name == tag.name);
        let created = try_join_all(
            split
                .unmatched
                .into_iter()
                .map(|name| self.create_or_fetch(owner_id, name)),
        )
        .await?;

        Ok(ProvisionedTags {
            created,
            existing: split.matched,
        })
    }

    /// Fetch the owner's tags, then [`Self::provision`] against them.
    pub async fn provision_for_owner(
        &self,
        owner_id: &UserId,
        desired: &[TagName],
    ) -> Result<ProvisionedTags, TagRepositoryError> {
        if desired.is_empty() {
            return Ok(ProvisionedTags::default());
        }
        let existing = self.tags.find_by_owner(owner_id).await?;
        self.provision(owner_id, desired, &existing).await
    }

    async fn create_or_fetch(
        &self,
        owner_id: &UserId,
        name: &TagName,
    ) -> Result<Tag, TagRepositoryError> {
        let _guard = self.locks.lock((*owner_id, name.clone())).await;

        if let Some(found) = self.tags.find_by_owner_and_name(owner_id, name).await? {
            debug!(owner_id = %owner_id, tag = %name, "tag appeared concurrently; reusing");
            return Ok(found);
        }

        let new_tag = NewTag {
            name: name.clone(),
            owner_id: *owner_id,
        };
        match self.tags.create(&new_tag).await {
            Ok(tag) => {
                info!(owner_id = %owner_id, tag_id = %tag.id, tag = %tag.name, "tag created");
                Ok(tag)
            }
            Err(TagRepositoryError::Duplicate { .. }) => {
                debug!(owner_id = %owner_id, tag = %name, "store rejected duplicate tag; reusing");
                self.tags
                    .find_by_owner_and_name(owner_id, name)
                    .await?
                    .ok_or_else(|| TagRepositoryError::not_found(name.to_string()))
            }
            Err(err) => Err(err),
        }
    }
}
