//! Delete tags no post references any more.

use std::sync::Arc;

use tracing::{debug, info};

use crate::domain::KeyedLocks;
use crate::domain::TagId;
use crate::domain::ports::{TagRepository, TagRepositoryError};

/// What [`OrphanTagCollector::collect_if_orphan`] found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionOutcome {
    /// The tag had no posts and was removed.
    Deleted,
    /// The tag is still referenced and was kept.
    InUse {
        /// Posts referencing the tag when it was last read.
        post_count: usize,
    },
    /// The tag was already gone.
    Missing,
}

/// Garbage collector for orphan tags, serialized per tag.
pub struct OrphanTagCollector<T> {
    tags: Arc<T>,
    locks: Arc<KeyedLocks<TagId>>,
}

impl<T> Clone for OrphanTagCollector<T> {
    fn clone(&self) -> Self {
        Self {
            tags: Arc::clone(&self.tags),
            locks: Arc::clone(&self.locks),
        }
    }
}

impl<T> OrphanTagCollector<T> {
    /// Create a collector over the given repository.
    pub fn new(tags: Arc<T>) -> Self {
        Self {
            tags,
            locks: Arc::new(KeyedLocks::new()),
        }
    }
}

impl<T> OrphanTagCollector<T>
where
    T: TagRepository,
{
    /// Load the tag's usage and delete it when no post references it.
    ///
    /// The delete itself is conditional, so a post connected between the
    /// usage read and the delete keeps the tag alive.
    pub async fn collect_if_orphan(
        &self,
        tag_id: &TagId,
    ) -> Result<CollectionOutcome, TagRepositoryError> {
        let _guard = self.locks.lock(*tag_id).await;

        let Some(usage) = self.tags.find_usage(tag_id).await? else {
            debug!(tag_id = %tag_id, "tag already removed");
            return Ok(CollectionOutcome::Missing);
        };
        if !usage.is_orphaned() {
            return Ok(CollectionOutcome::InUse {
                post_count: usage.post_count(),
            });
        }

        if self.tags.delete_if_unreferenced(tag_id).await? {
            info!(tag_id = %tag_id, tag = %usage.tag.name, "orphan tag deleted");
            return Ok(CollectionOutcome::Deleted);
        }

        match self.tags.find_usage(tag_id).await? {
            Some(current) => {
                debug!(tag_id = %tag_id, "tag gained a post before deletion; kept");
                Ok(CollectionOutcome::InUse {
                    post_count: current.post_count(),
                })
            }
            None => {
                debug!(tag_id = %tag_id, "tag removed before deletion");
                Ok(CollectionOutcome::Missing)
            }
        }
    }
}
