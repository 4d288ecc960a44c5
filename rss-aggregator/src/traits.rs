use crate::types::{FetchOutcome, LiveSourceSpec};
use async_trait::async_trait;

/// Trait for pulling raw entries from a feed source
#[async_trait]
pub trait FeedRetriever: Send + Sync {
    /// Fetch and parse everything the source currently publishes.
    /// Failures are reported as [`FetchOutcome::Failed`], never as a panic or error,
    /// so one broken source cannot take down a run.
    async fn retrieve(&self, source: &LiveSourceSpec) -> FetchOutcome;
}
