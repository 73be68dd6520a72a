//! Rate snapshots produced by upstream sources.

use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Identifies one upstream price feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceId {
    /// Upbit USDT price in KRW.
    Upbit,
    /// Bithumb USDT price in KRW.
    Bithumb,
    /// Roubles per one million won.
    KrwRub,
    /// ABCEX USDT/RUB order book top.
    Abcex,
}

impl SourceId {
    /// Every source, in display order.
    pub const ALL: [SourceId; 4] = [Self::Upbit, Self::Bithumb, Self::KrwRub, Self::Abcex];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Upbit => "upbit",
            Self::Bithumb => "bithumb",
            Self::KrwRub => "krw_rub",
            Self::Abcex => "abcex",
        }
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A value reported by a source: a single price or a best bid/ask pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Quote {
    Price(Decimal),
    BidAsk { bid: Decimal, ask: Decimal },
}

impl Quote {
    /// True when every component is strictly positive.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        match *self {
            Self::Price(price) => price > Decimal::ZERO,
            Self::BidAsk { bid, ask } => bid > Decimal::ZERO && ask > Decimal::ZERO,
        }
    }

    /// The single price, if this is a [`Quote::Price`].
    #[must_use]
    pub fn price(&self) -> Option<Decimal> {
        match *self {
            Self::Price(price) => Some(price),
            Self::BidAsk { .. } => None,
        }
    }

    /// The bid/ask pair, if this is a [`Quote::BidAsk`].
    #[must_use]
    pub fn bid_ask(&self) -> Option<(Decimal, Decimal)> {
        match *self {
            Self::Price(_) => None,
            Self::BidAsk { bid, ask } => Some((bid, ask)),
        }
    }
}

/// One successful fetch from one source.
///
/// Immutable once created; a later successful fetch from the same source
/// supersedes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateSnapshot {
    pub source: SourceId,
    pub quote: Quote,
    pub fetched_at: DateTime<Utc>,
    /// False when the snapshot is served from cache after a failed refresh.
    pub fresh: bool,
}

impl RateSnapshot {
    #[must_use]
    pub fn new(source: SourceId, quote: Quote, fetched_at: DateTime<Utc>) -> Self {
        Self {
            source,
            quote,
            fetched_at,
            fresh: true,
        }
    }

    /// The same snapshot, marked as served from cache.
    #[must_use]
    pub fn stale(self) -> Self {
        Self {
            fresh: false,
            ..self
        }
    }

    /// Age of the snapshot relative to `now`.
    #[must_use]
    pub fn age(&self, now: DateTime<Utc>) -> chrono::Duration {
        now - self.fetched_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn quote_validity_requires_positive_values() {
        assert!(Quote::Price(dec!(1450)).is_valid());
        assert!(!Quote::Price(dec!(0)).is_valid());
        assert!(!Quote::BidAsk {
            bid: dec!(95.1),
            ask: dec!(-1)
        }
        .is_valid());
    }

    #[test]
    fn stale_keeps_value_and_timestamp() {
        let at = Utc::now();
        let snap = RateSnapshot::new(SourceId::Upbit, Quote::Price(dec!(1460)), at);
        let stale = snap.stale();
        assert!(!stale.fresh);
        assert_eq!(stale.quote, snap.quote);
        assert_eq!(stale.fetched_at, at);
    }
}
