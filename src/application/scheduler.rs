//! Periodic delivery to subscribers.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use super::aggregator::RateAggregator;
use super::audit::AuditLog;
use super::registry::SubscriptionRegistry;
use super::render::{render_summary, SummaryStyle};
use crate::domain::schedule::QuietHours;
use crate::port::outbound::clock::Clock;
use crate::port::outbound::messenger::{Messenger, OutgoingMessage};

/// Per-wake delivery counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeliveryReport {
    pub delivered: usize,
    /// Subscriptions dropped because the recipient is gone for good.
    pub removed: usize,
    /// Transient failures, retried on a later wake.
    pub failed: usize,
}

/// What one wake of the scheduler did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    NoSubscribers,
    QuietHours,
    NothingDue,
    /// Every source failed; nobody was contacted.
    Unavailable,
    Delivered(DeliveryReport),
}

/// Wakes on a fixed period and pushes the shared summary to due subscribers.
pub struct Scheduler {
    registry: Arc<SubscriptionRegistry>,
    aggregator: Arc<RateAggregator>,
    messenger: Arc<dyn Messenger>,
    audit: AuditLog,
    clock: Arc<dyn Clock>,
    quiet: QuietHours,
    style: Arc<SummaryStyle>,
    period: Duration,
}

impl Scheduler {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        registry: Arc<SubscriptionRegistry>,
        aggregator: Arc<RateAggregator>,
        messenger: Arc<dyn Messenger>,
        audit: AuditLog,
        clock: Arc<dyn Clock>,
        quiet: QuietHours,
        style: Arc<SummaryStyle>,
        period: Duration,
    ) -> Self {
        Self {
            registry,
            aggregator,
            messenger,
            audit,
            clock,
            quiet,
            style,
            period,
        }
    }

    /// Run forever, one [`Scheduler::run_cycle`] per period.
    ///
    /// The first wake happens one period after start.
    pub async fn run(self: Arc<Self>) {
        let mut ticker = interval_at(Instant::now() + self.period, self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!(period_secs = self.period.as_secs(), "Scheduler started");

        loop {
            ticker.tick().await;
            let outcome = self.run_cycle().await;
            debug!(?outcome, "Scheduler wake finished");
        }
    }

    /// One wake: check quiet hours, aggregate once, deliver to every due chat.
    pub async fn run_cycle(&self) -> CycleOutcome {
        if self.registry.is_empty() {
            return CycleOutcome::NoSubscribers;
        }

        let now = self.clock.now();
        if self.quiet.is_quiet(now) {
            return CycleOutcome::QuietHours;
        }

        let due = self.registry.due(now);
        if due.is_empty() {
            return CycleOutcome::NothingDue;
        }

        let board = match self.aggregator.aggregate().await {
            Ok(board) => board,
            Err(err) => {
                warn!(error = %err, due = due.len(), "Skipping scheduled delivery");
                return CycleOutcome::Unavailable;
            }
        };
        let text = render_summary(&board, &self.style);

        let mut report = DeliveryReport::default();
        for subscription in due {
            let chat = subscription.chat;
            match self
                .messenger
                .send(chat, OutgoingMessage::html(text.clone()))
                .await
            {
                Ok(_) => {
                    self.registry.mark_delivered(chat, now);
                    report.delivered += 1;
                }
                Err(err) if err.is_recipient_gone() => {
                    self.registry.unsubscribe(chat);
                    report.removed += 1;
                    info!(chat_id = chat.0, error = %err, "Dropping unreachable subscriber");
                }
                Err(err) => {
                    report.failed += 1;
                    warn!(chat_id = chat.0, error = %err, "Scheduled delivery failed");
                }
            }
        }

        info!(
            delivered = report.delivered,
            removed = report.removed,
            failed = report.failed,
            subscribers = self.registry.len(),
            "Scheduled delivery finished"
        );

        self.audit
            .record(format!(
                "⏱ Автообновление ({} пользователей) – {}",
                self.registry.len(),
                now.format("%H:%M:%S")
            ))
            .await;

        CycleOutcome::Delivered(report)
    }
}
