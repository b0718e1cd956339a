//! The feed seam shared by every storefront fetcher.

use crate::FeedError;
use async_trait::async_trait;
use deals_core::{DealRecord, FeedSource};

/// Result of polling one feed.
///
/// The scheduler treats both variants the same way (a failure yields no
/// deals), but keeping them apart lets callers tell "nothing new" from
/// "fetch failed".
#[derive(Debug)]
pub enum FetchOutcome {
    /// Upstream answered; contains only deals not announced before.
    Fetched(Vec<DealRecord>),
    /// Transport or parse failure, swallowed for this cycle.
    Failed(FeedError),
}

impl FetchOutcome {
    pub fn is_failed(&self) -> bool {
        matches!(self, FetchOutcome::Failed(_))
    }

    /// New deals, empty on failure.
    pub fn deals(&self) -> &[DealRecord] {
        match self {
            FetchOutcome::Fetched(deals) => deals,
            FetchOutcome::Failed(_) => &[],
        }
    }

    pub fn into_deals(self) -> Vec<DealRecord> {
        match self {
            FetchOutcome::Fetched(deals) => deals,
            FetchOutcome::Failed(_) => Vec::new(),
        }
    }
}

impl From<Result<Vec<DealRecord>, FeedError>> for FetchOutcome {
    fn from(result: Result<Vec<DealRecord>, FeedError>) -> Self {
        match result {
            Ok(deals) => FetchOutcome::Fetched(deals),
            Err(e) => FetchOutcome::Failed(e),
        }
    }
}

/// A storefront feed that owns its own deduplication state.
#[async_trait]
pub trait DealFeed: Send {
    /// Which storefront this feed polls.
    fn source(&self) -> FeedSource;

    /// Poll upstream once and return deals not seen before.
    ///
    /// Never panics or errors out: failures come back as
    /// [`FetchOutcome::Failed`].
    async fn fetch(&mut self) -> FetchOutcome;
}
