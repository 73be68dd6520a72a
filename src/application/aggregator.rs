//! Fan-out over every rate source.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, FixedOffset};
use futures_util::future::join_all;
use rust_decimal::Decimal;
use thiserror::Error;
use tracing::{debug, warn};

use crate::domain::rate::{RateSnapshot, SourceId};
use crate::port::outbound::clock::Clock;
use crate::port::outbound::source::RateSource;

/// Aggregation produced nothing worth showing.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregateError {
    #[error("no rate source returned a value")]
    AllUnavailable,
}

/// Whatever subset of sources answered, stamped with the local time.
#[derive(Debug, Clone, PartialEq)]
pub struct RateBoard {
    pub generated_at: DateTime<FixedOffset>,
    snapshots: Vec<RateSnapshot>,
}

impl RateBoard {
    #[must_use]
    pub fn new(generated_at: DateTime<FixedOffset>, snapshots: Vec<RateSnapshot>) -> Self {
        Self {
            generated_at,
            snapshots,
        }
    }

    #[must_use]
    pub fn get(&self, source: SourceId) -> Option<&RateSnapshot> {
        self.snapshots.iter().find(|s| s.source == source)
    }

    /// Single price reported by `source`, if available.
    #[must_use]
    pub fn price(&self, source: SourceId) -> Option<Decimal> {
        self.get(source).and_then(|s| s.quote.price())
    }

    /// Bid/ask pair reported by `source`, if available.
    #[must_use]
    pub fn bid_ask(&self, source: SourceId) -> Option<(Decimal, Decimal)> {
        self.get(source).and_then(|s| s.quote.bid_ask())
    }

    #[must_use]
    pub fn available(&self) -> usize {
        self.snapshots.len()
    }
}

/// Queries all sources concurrently and collects the results.
pub struct RateAggregator {
    sources: Vec<Arc<dyn RateSource>>,
    per_source_timeout: Duration,
    clock: Arc<dyn Clock>,
}

impl RateAggregator {
    pub fn new(
        sources: Vec<Arc<dyn RateSource>>,
        per_source_timeout: Duration,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            sources,
            per_source_timeout,
            clock,
        }
    }

    /// Fetch every source once.
    ///
    /// Each call is bounded by the per-source timeout; a source that times
    /// out contributes its cached snapshot, if any. Wall time is bounded by
    /// the slowest source, not the sum.
    ///
    /// # Errors
    ///
    /// [`AggregateError::AllUnavailable`] when no source produced a value.
    pub async fn aggregate(&self) -> Result<RateBoard, AggregateError> {
        let timeout = self.per_source_timeout;
        let calls = self.sources.iter().map(|source| {
            let source = Arc::clone(source);
            async move {
                match tokio::time::timeout(timeout, source.fetch()).await {
                    Ok(snapshot) => snapshot,
                    Err(_) => {
                        warn!(
                            source = %source.source(),
                            timeout_ms = timeout.as_millis() as u64,
                            "Rate source timed out"
                        );
                        source.cached().map(RateSnapshot::stale)
                    }
                }
            }
        });

        let snapshots: Vec<RateSnapshot> = join_all(calls).await.into_iter().flatten().collect();

        debug!(
            available = snapshots.len(),
            total = self.sources.len(),
            "Aggregated rates"
        );

        if snapshots.is_empty() {
            return Err(AggregateError::AllUnavailable);
        }

        Ok(RateBoard::new(self.clock.now(), snapshots))
    }
}
