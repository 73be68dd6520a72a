//! In-memory subscription registry.
//!
//! Written by the request handler (subscribe / unsubscribe) and by the
//! scheduler (delivery timestamps, removal of unreachable chats). Races
//! between the two are tolerated: the worst case is one late or duplicate
//! delivery.

use chrono::{DateTime, FixedOffset};
use dashmap::DashMap;

use crate::domain::id::ChatId;
use crate::domain::schedule::QuietHours;
use crate::domain::subscription::{NotifyInterval, Subscription};

/// At most one subscription per chat. Lost on restart.
#[derive(Debug, Default)]
pub struct SubscriptionRegistry {
    entries: DashMap<ChatId, Subscription>,
    quiet: QuietHours,
}

impl SubscriptionRegistry {
    #[must_use]
    pub fn new(quiet: QuietHours) -> Self {
        Self {
            entries: DashMap::new(),
            quiet,
        }
    }

    /// Create or replace the chat's subscription, restarting its delivery clock.
    pub fn subscribe(
        &self,
        chat: ChatId,
        interval: NotifyInterval,
        now: DateTime<FixedOffset>,
    ) -> Subscription {
        let subscription = Subscription::start(chat, interval, now, &self.quiet);
        self.entries.insert(chat, subscription);
        subscription
    }

    /// Remove the chat's subscription, returning it if there was one.
    pub fn unsubscribe(&self, chat: ChatId) -> Option<Subscription> {
        self.entries.remove(&chat).map(|(_, sub)| sub)
    }

    #[must_use]
    pub fn get(&self, chat: ChatId) -> Option<Subscription> {
        self.entries.get(&chat).map(|entry| *entry)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Snapshot of subscriptions whose interval has elapsed at `now`.
    #[must_use]
    pub fn due(&self, now: DateTime<FixedOffset>) -> Vec<Subscription> {
        let mut due: Vec<Subscription> = self
            .entries
            .iter()
            .filter(|entry| entry.is_due(now))
            .map(|entry| *entry)
            .collect();
        due.sort_by_key(|sub| sub.chat);
        due
    }

    /// Record a delivery. No-op if the chat unsubscribed meanwhile.
    pub fn mark_delivered(&self, chat: ChatId, at: DateTime<FixedOffset>) -> bool {
        match self.entries.get_mut(&chat) {
            Some(mut entry) => {
                entry.last_delivery = Some(at);
                true
            }
            None => false,
        }
    }
}
