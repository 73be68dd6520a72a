//! Rate source ports.
//!
//! Two layers: a [`QuoteFetcher`] performs exactly one upstream call and
//! reports success or failure; a [`RateSource`] is what the aggregator
//! sees, and never fails - it degrades to a cached snapshot or to nothing.

use async_trait::async_trait;

use crate::domain::rate::{Quote, RateSnapshot, SourceId};
use crate::error::Result;

/// One raw upstream call.
#[async_trait]
pub trait QuoteFetcher: Send + Sync {
    /// Which source this fetcher speaks for.
    fn source(&self) -> SourceId;

    /// Fetch and parse the current quote.
    ///
    /// # Errors
    ///
    /// Network failures, timeouts, non-success statuses and unusable bodies.
    async fn fetch_quote(&self) -> Result<Quote>;
}

/// A rate source as consumed by the aggregator.
#[async_trait]
pub trait RateSource: Send + Sync {
    fn source(&self) -> SourceId;

    /// Current value, the last known-good value, or `None` if neither exists.
    async fn fetch(&self) -> Option<RateSnapshot>;

    /// Last known-good value without touching the network.
    fn cached(&self) -> Option<RateSnapshot>;
}
