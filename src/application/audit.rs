//! Best-effort audit trail to an operator chat.

use std::sync::Arc;

use chrono::{DateTime, FixedOffset};
use tracing::debug;

use crate::domain::id::{ChatId, Requester};
use crate::port::outbound::messenger::{Messenger, OutgoingMessage};

/// Writes human-readable action lines to a log channel.
///
/// Every failure is swallowed; nothing here may affect the user path.
#[derive(Clone)]
pub struct AuditLog {
    channel: Option<ChatId>,
    messenger: Arc<dyn Messenger>,
    zone_label: String,
}

impl AuditLog {
    pub fn new(
        channel: Option<ChatId>,
        messenger: Arc<dyn Messenger>,
        zone_label: impl Into<String>,
    ) -> Self {
        Self {
            channel,
            messenger,
            zone_label: zone_label.into(),
        }
    }

    #[must_use]
    pub fn zone_label(&self) -> &str {
        &self.zone_label
    }

    /// Post `text` to the audit channel, if one is configured.
    pub async fn record(&self, text: impl Into<String>) {
        let Some(channel) = self.channel else {
            return;
        };
        if let Err(err) = self
            .messenger
            .send(channel, OutgoingMessage::plain(text))
            .await
        {
            debug!(error = %err, "Audit write failed");
        }
    }

    /// Post a "who did what, when" line.
    pub async fn user_action(&self, who: &Requester, action: &str, at: DateTime<FixedOffset>) {
        self.record(format!(
            "👤 {} (ID {})\n🕒 {} {}\n➡️ {action}",
            who.audit_handle(),
            who.user,
            at.format("%d.%m.%Y %H:%M:%S"),
            self.zone_label,
        ))
        .await;
    }
}
