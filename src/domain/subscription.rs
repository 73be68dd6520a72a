//! Periodic delivery subscriptions.

use chrono::{DateTime, Duration, FixedOffset};

use super::id::ChatId;
use super::schedule::QuietHours;

/// How often a subscriber wants the rate summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotifyInterval {
    Hourly,
    FiveHours,
    Daily,
}

impl NotifyInterval {
    pub const ALL: [NotifyInterval; 3] = [Self::Hourly, Self::FiveHours, Self::Daily];

    /// Minimum time between two deliveries.
    #[must_use]
    pub fn period(self) -> Duration {
        match self {
            Self::Hourly => Duration::hours(1),
            Self::FiveHours => Duration::hours(5),
            Self::Daily => Duration::hours(24),
        }
    }

    /// Human-readable frequency, as shown to the subscriber.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Hourly => "каждый 1 час",
            Self::FiveHours => "каждые 5 часов",
            Self::Daily => "каждые 24 часа",
        }
    }

    /// Short code used in callback payloads and logs.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Hourly => "1h",
            Self::FiveHours => "5h",
            Self::Daily => "24h",
        }
    }

    /// Parse a short code produced by [`NotifyInterval::code`].
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|interval| interval.code() == code)
    }

    /// Timestamp to record as "last delivered" when the subscription starts.
    ///
    /// Short intervals count from `now`. The daily interval is aligned so the
    /// first delivery lands on the next opening of the delivery window.
    #[must_use]
    pub fn initial_last_delivery(
        self,
        now: DateTime<FixedOffset>,
        quiet: &QuietHours,
    ) -> DateTime<FixedOffset> {
        match self {
            Self::Hourly | Self::FiveHours => now,
            Self::Daily => quiet.next_opening(now) - self.period(),
        }
    }
}

/// A chat's opt-in to periodic rate delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Subscription {
    pub chat: ChatId,
    pub interval: NotifyInterval,
    pub last_delivery: Option<DateTime<FixedOffset>>,
}

impl Subscription {
    /// Start a subscription at `now`, initializing the delivery clock per interval.
    #[must_use]
    pub fn start(
        chat: ChatId,
        interval: NotifyInterval,
        now: DateTime<FixedOffset>,
        quiet: &QuietHours,
    ) -> Self {
        Self {
            chat,
            interval,
            last_delivery: Some(interval.initial_last_delivery(now, quiet)),
        }
    }

    /// Whether the interval has elapsed since the last delivery.
    #[must_use]
    pub fn is_due(&self, now: DateTime<FixedOffset>) -> bool {
        match self.last_delivery {
            Some(last) => now - last >= self.interval.period(),
            None => true,
        }
    }
}
