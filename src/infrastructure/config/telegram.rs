//! Telegram bot configuration.

use std::time::Duration;

use serde::Deserialize;

/// Telegram bot configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct TelegramAppConfig {
    /// Bot API token. Loaded from `TELEGRAM_TOKEN` only, never from the file.
    #[serde(skip)]
    pub bot_token: Option<String>,
    /// Chat receiving the audit trail. Overridden by `AUDIT_CHAT_ID`.
    #[serde(default)]
    pub audit_chat_id: Option<i64>,
    /// Loading animation frame period in milliseconds (0 disables it).
    #[serde(default = "default_animation_ms")]
    pub animation_ms: u64,
}

const fn default_animation_ms() -> u64 {
    600
}

impl TelegramAppConfig {
    #[must_use]
    pub fn animation(&self) -> Duration {
        Duration::from_millis(self.animation_ms)
    }
}

impl Default for TelegramAppConfig {
    fn default() -> Self {
        Self {
            bot_token: None,
            audit_chat_id: None,
            animation_ms: default_animation_ms(),
        }
    }
}
