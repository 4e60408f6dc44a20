//! Port for handing orphan-tag candidates to background garbage collection.
//!
//! Post mutations enqueue the tags they detached and return without waiting.
//! Adapters decide whether collection runs inline or on a background worker.
use async_trait::async_trait;

use crate::domain::{PostId, TagId};

use super::define_port_error;

define_port_error! {
    /// Errors surfaced by the cleanup queue adapter.
    pub enum TagCleanupQueueError {
        /// Queue infrastructure is unavailable.
        Unavailable { message: String } => "tag cleanup queue is unavailable: {message}",
        /// The request could not be accepted.
        Rejected { message: String } => "tag cleanup request was rejected: {message}",
    }
}

/// Why a set of tags became orphan candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CleanupReason {
    /// The tags were disconnected from a post by an update.
    PostUpdated,
    /// The post referencing the tags was deleted.
    PostDeleted,
}

impl CleanupReason {
    /// Stable label used in logs.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::PostUpdated => "post_updated",
            Self::PostDeleted => "post_deleted",
        }
    }
}

/// Tags to inspect, and delete if no post references them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagCleanupRequest {
    /// Post whose mutation produced the candidates.
    pub post_id: PostId,
    /// Candidate tags.
    pub tag_ids: Vec<TagId>,
    /// Mutation that detached the tags.
    pub reason: CleanupReason,
}

/// Queue accepting orphan collection work.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TagCleanupQueue: Send + Sync {
    /// Accept a request for eventual processing.
    async fn enqueue(&self, request: TagCleanupRequest) -> Result<(), TagCleanupQueueError>;
}

/// Queue that discards every request.
#[derive(Debug, Default, Clone, Copy)]
pub struct DiscardingTagCleanupQueue;

#[async_trait]
impl TagCleanupQueue for DiscardingTagCleanupQueue {
    async fn enqueue(&self, _request: TagCleanupRequest) -> Result<(), TagCleanupQueueError> {
        Ok(())
    }
}
