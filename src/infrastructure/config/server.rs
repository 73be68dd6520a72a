//! Liveness endpoint and keep-alive settings.

use std::time::Duration;

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Port of the liveness endpoint. Overridden by `PORT`.
    #[serde(default = "default_port")]
    pub port: u16,
    /// URL pinged periodically so the host does not idle the service.
    /// Overridden by `KEEPALIVE_URL`.
    #[serde(default)]
    pub keepalive_url: Option<String>,
    #[serde(default = "default_keepalive_interval_secs")]
    pub keepalive_interval_secs: u64,
    /// Delay before a supervised task is restarted.
    #[serde(default = "default_restart_delay_secs")]
    pub restart_delay_secs: u64,
}

const fn default_port() -> u16 {
    10_000
}

const fn default_keepalive_interval_secs() -> u64 {
    600
}

const fn default_restart_delay_secs() -> u64 {
    5
}

impl ServerConfig {
    #[must_use]
    pub fn keepalive_interval(&self) -> Duration {
        Duration::from_secs(self.keepalive_interval_secs)
    }

    #[must_use]
    pub fn restart_delay(&self) -> Duration {
        Duration::from_secs(self.restart_delay_secs)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            keepalive_url: None,
            keepalive_interval_secs: default_keepalive_interval_secs(),
            restart_delay_secs: default_restart_delay_secs(),
        }
    }
}
