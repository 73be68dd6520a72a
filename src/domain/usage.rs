//! Per-user request counters.

use chrono::{DateTime, FixedOffset};

use super::id::UserId;

/// How often a user asked for the rate, and when last.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UsageStat {
    pub user: UserId,
    pub requests: u64,
    pub last_request: Option<DateTime<FixedOffset>>,
}

impl UsageStat {
    #[must_use]
    pub const fn new(user: UserId) -> Self {
        Self {
            user,
            requests: 0,
            last_request: None,
        }
    }

    /// Count one more request made at `at`.
    pub fn record(&mut self, at: DateTime<FixedOffset>) {
        self.requests = self.requests.saturating_add(1);
        self.last_request = Some(at);
    }
}
