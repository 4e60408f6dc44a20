//! Tag cleanup queue adapters.
//!
//! [`ChannelTagCleanupQueue`] hands requests to a background Tokio task that
//! runs a [`TagCleanupWorker`], so post mutations return before collection
//! finishes. [`InlineTagCleanupQueue`] runs the worker inside `enqueue` and
//! suits tests that assert on the store right after a mutation.

use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::domain::TagCleanupWorker;
use crate::domain::ports::{
    TagCleanupQueue, TagCleanupQueueError, TagCleanupRequest, TagRepository,
};

/// Queue that collects orphan tags before `enqueue` returns.
pub struct InlineTagCleanupQueue<T> {
    worker: TagCleanupWorker<T>,
}

impl<T> InlineTagCleanupQueue<T> {
    /// Wrap `worker` so each request is processed during `enqueue`.
    pub fn new(worker: TagCleanupWorker<T>) -> Self {
        Self { worker }
    }
}

#[async_trait]
impl<T> TagCleanupQueue for InlineTagCleanupQueue<T>
where
    T: TagRepository,
{
    async fn enqueue(&self, request: TagCleanupRequest) -> Result<(), TagCleanupQueueError> {
        self.worker.process(&request).await;
        Ok(())
    }
}

/// Queue backed by an unbounded channel drained by a background task.
#[derive(Debug, Clone)]
pub struct ChannelTagCleanupQueue {
    sender: mpsc::UnboundedSender<TagCleanupRequest>,
}

/// Handle on the background cleanup task.
#[derive(Debug)]
pub struct CleanupWorkerHandle {
    task: JoinHandle<usize>,
}

impl CleanupWorkerHandle {
    /// Wait for the task to drain the channel after every queue clone has
    /// been dropped. Returns the number of requests processed.
    pub async fn finish(self) -> Result<usize, TagCleanupQueueError> {
        self.task
            .await
            .map_err(|err| TagCleanupQueueError::unavailable(err.to_string()))
    }

    /// Stop the task without draining pending requests.
    pub fn abort(&self) {
        self.task.abort();
    }
}

impl ChannelTagCleanupQueue {
    /// Spawn the worker on the current Tokio runtime.
    pub fn spawn<T>(worker: TagCleanupWorker<T>) -> (Self, CleanupWorkerHandle)
    where
        T: TagRepository + 'static,
    {
        let (sender, mut receiver) = mpsc::unbounded_channel::<TagCleanupRequest>();
        let task = tokio::spawn(async move {
            let mut processed = 0_usize;
            while let Some(request) = receiver.recv().await {
                let report = worker.process(&request).await;
                if !report.failed.is_empty() {
                    warn!(
                        post_id = %request.post_id,
                        failed = report.failed.len(),
                        "tag cleanup left candidates behind"
                    );
                }
                processed += 1;
            }
            info!(processed, "tag cleanup worker stopped");
            processed
        });
        (Self { sender }, CleanupWorkerHandle { task })
    }
}

#[async_trait]
impl TagCleanupQueue for ChannelTagCleanupQueue {
    async fn enqueue(&self, request: TagCleanupRequest) -> Result<(), TagCleanupQueueError> {
        debug!(
            post_id = %request.post_id,
            reason = request.reason.as_str(),
            tags = request.tag_ids.len(),
            "tag cleanup queued"
        );
        self.sender
            .send(request)
            .map_err(|_| TagCleanupQueueError::unavailable("cleanup worker has stopped"))
    }
}
