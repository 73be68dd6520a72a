//! In-memory usage counters.

use chrono::{DateTime, FixedOffset};
use dashmap::DashMap;

use crate::domain::id::UserId;
use crate::domain::usage::UsageStat;

/// Request counters per user. Entries are created on first request and
/// never removed; everything is lost on restart.
#[derive(Debug, Default)]
pub struct UsageStore {
    stats: DashMap<UserId, UsageStat>,
}

impl UsageStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one rate request by `user` at `at`.
    pub fn record(&self, user: UserId, at: DateTime<FixedOffset>) -> UsageStat {
        let mut entry = self
            .stats
            .entry(user)
            .or_insert_with(|| UsageStat::new(user));
        entry.record(at);
        *entry
    }

    /// Current counters; zeroed for users who never asked.
    #[must_use]
    pub fn get(&self, user: UserId) -> UsageStat {
        self.stats
            .get(&user)
            .map_or_else(|| UsageStat::new(user), |entry| *entry)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.stats.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stats.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testkit::clock::msk;

    #[test]
    fn unknown_user_reads_as_zero_without_insert() {
        let store = UsageStore::new();
        let stat = store.get(UserId(9));
        assert_eq!(stat.requests, 0);
        assert_eq!(stat.last_request, None);
        assert!(store.is_empty());
    }

    #[test]
    fn record_increments_and_stamps() {
        let store = UsageStore::new();
        store.record(UserId(9), msk(2024, 5, 10, 10, 0));
        let stat = store.record(UserId(9), msk(2024, 5, 10, 12, 30));

        assert_eq!(stat.requests, 2);
        assert_eq!(stat.last_request, Some(msk(2024, 5, 10, 12, 30)));
        assert_eq!(store.get(UserId(9)), stat);
        assert_eq!(store.len(), 1);
    }
}
