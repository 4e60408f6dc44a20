//! Background processing of orphan-tag cleanup requests.
//!
//! Each candidate tag is collected independently. Transient store failures
//! are retried with capped exponential backoff; anything else, or running out
//! of attempts, is logged and the tag is left for a later request.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, error, warn};

use crate::domain::TagId;
use crate::domain::orphan_collector::{CollectionOutcome, OrphanTagCollector};
use crate::domain::ports::{TagCleanupRequest, TagRepository};

/// Retry settings for cleanup attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CleanupRetryPolicy {
    /// Collection attempts per tag, including the first.
    pub max_attempts: u32,
    /// Delay before the second attempt.
    pub initial_backoff: Duration,
    /// Upper bound for any single delay.
    pub max_backoff: Duration,
}

impl Default for CleanupRetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff: Duration::from_millis(100),
            max_backoff: Duration::from_secs(2),
        }
    }
}

impl CleanupRetryPolicy {
    /// Delay after the failed attempt numbered `attempt` (1-based).
    ///
    /// # Examples
    /// ```
    /// use std::time::Duration;
    /// use blog_backend::domain::CleanupRetryPolicy;
    ///
    /// let policy = CleanupRetryPolicy {
    ///     max_attempts: 5,
    ///     initial_backoff: Duration::from_millis(100),
    ///     max_backoff: Duration::from_millis(250),
    /// };
    /// assert_eq!(policy.backoff_for(1), Duration::from_millis(100));
    /// assert_eq!(policy.backoff_for(2), Duration::from_millis(200));
    /// assert_eq!(policy.backoff_for(3), Duration::from_millis(250));
    /// ```
    pub fn backoff_for(&self, attempt: u32) -> Duration {
        let exponent = 2_u32.saturating_pow(attempt.saturating_sub(1));
        let base_ms = u64::try_from(self.initial_backoff.as_millis()).unwrap_or(u64::MAX);
        let max_ms = u64::try_from(self.max_backoff.as_millis()).unwrap_or(u64::MAX);
        Duration::from_millis(base_ms.saturating_mul(u64::from(exponent)).min(max_ms))
    }
}

/// Async sleep used between retries.
#[async_trait]
pub trait CleanupSleeper: Send + Sync {
    /// Suspend execution for `duration`.
    async fn sleep(&self, duration: Duration);
}

/// Tokio-based sleeper implementation.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl CleanupSleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Per-request summary of what the worker did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanupReport {
    /// Tags removed, including ones that were already gone.
    pub deleted: Vec<TagId>,
    /// Tags kept because posts still reference them.
    pub retained: Vec<TagId>,
    /// Tags whose collection gave up.
    pub failed: Vec<TagId>,
}

/// Runs orphan collection for queued cleanup requests.
pub struct TagCleanupWorker<T> {
    collector: OrphanTagCollector<T>,
    policy: CleanupRetryPolicy,
    sleeper: Arc<dyn CleanupSleeper>,
}

impl<T> Clone for TagCleanupWorker<T> {
    fn clone(&self) -> Self {
        Self {
            collector: self.collector.clone(),
            policy: self.policy,
            sleeper: Arc::clone(&self.sleeper),
        }
    }
}

impl<T> TagCleanupWorker<T>
where
    T: TagRepository,
{
    /// Build a worker sleeping on the Tokio timer.
    pub fn new(tags: Arc<T>, policy: CleanupRetryPolicy) -> Self {
        Self::with_sleeper(tags, policy, Arc::new(TokioSleeper))
    }

    /// Build a worker with an injected sleeper.
    pub fn with_sleeper(
        tags: Arc<T>,
        policy: CleanupRetryPolicy,
        sleeper: Arc<dyn CleanupSleeper>,
    ) -> Self {
        Self {
            collector: OrphanTagCollector::new(tags),
            policy,
            sleeper,
        }
    }

    /// Collect every candidate in `request`. Never fails; see the report.
    pub async fn process(&self, request: &TagCleanupRequest) -> CleanupReport {
        let mut report = CleanupReport::default();
        for tag_id in &request.tag_ids {
            match self.collect_with_retry(request, tag_id).await {
                Some(CollectionOutcome::Deleted | CollectionOutcome::Missing) => {
                    report.deleted.push(*tag_id);
                }
                Some(CollectionOutcome::InUse { .. }) => report.retained.push(*tag_id),
                None => report.failed.push(*tag_id),
            }
        }
        debug!(
            post_id = %request.post_id,
            reason = request.reason.as_str(),
            deleted = report.deleted.len(),
            retained = report.retained.len(),
            failed = report.failed.len(),
            "tag cleanup processed"
        );
        report
    }

    async fn collect_with_retry(
        &self,
        request: &TagCleanupRequest,
        tag_id: &TagId,
    ) -> Option<CollectionOutcome> {
        let max_attempts = self.policy.max_attempts.max(1);
        for attempt in 1..=max_attempts {
            match self.collector.collect_if_orphan(tag_id).await {
                Ok(outcome) => return Some(outcome),
                Err(err) if err.is_transient() && attempt < max_attempts => {
                    let delay = self.policy.backoff_for(attempt);
                    warn!(
                        tag_id = %tag_id,
                        post_id = %request.post_id,
                        attempt,
                        delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                        error = %err,
                        "tag cleanup attempt failed; retrying"
                    );
                    self.sleeper.sleep(delay).await;
                }
                Err(err) => {
                    error!(
                        tag_id = %tag_id,
                        post_id = %request.post_id,
                        reason = request.reason.as_str(),
                        attempt,
                        error = %err,
                        "tag cleanup abandoned"
                    );
                    return None;
                }
            }
        }
        None
    }
}
