//! Application configuration loading and validation.
//!
//! Provides the main [`Config`] struct that aggregates all application settings.
//! Configuration is loaded from a TOML file with environment variable overrides
//! for deployment-specific values. The bot token is read from `TELEGRAM_TOKEN`
//! only.
//!
//! # Example
//!
//! ```no_run
//! use ratebot::infrastructure::config::settings::Config;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load("config.toml")?;
//!     config.init_logging();
//!     Ok(())
//! }
//! ```

use std::path::Path;
use std::str::FromStr;

use serde::Deserialize;

use super::logging::LoggingConfig;
use super::schedule::ScheduleConfig;
use super::server::ServerConfig;
use super::telegram::TelegramAppConfig;
use crate::adapter::outbound::source::settings::SourcesConfig;
use crate::error::{ConfigError, Result};

/// Environment variable naming the config file path.
pub const CONFIG_PATH_ENV: &str = "RATEBOT_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

const TOKEN_ENV: &str = "TELEGRAM_TOKEN";
const AUDIT_CHAT_ENV: &str = "AUDIT_CHAT_ID";
const PORT_ENV: &str = "PORT";
const KEEPALIVE_ENV: &str = "KEEPALIVE_URL";

/// Main application configuration.
///
/// Every section is optional; an empty file yields the defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub telegram: TelegramAppConfig,

    /// Logging and tracing configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Scheduler cadence, quiet hours and local time zone.
    #[serde(default)]
    pub schedule: ScheduleConfig,

    /// Upstream rate endpoints.
    #[serde(default)]
    pub sources: SourcesConfig,

    /// Liveness endpoint and keep-alive pinger.
    #[serde(default)]
    pub server: ServerConfig,
}

fn env_value<F>(env: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    env(key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_env<T, F>(env: &F, key: &'static str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    env_value(env, key)
        .map(|raw| {
            raw.parse().map_err(|e: T::Err| {
                ConfigError::InvalidValue {
                    field: key,
                    reason: e.to_string(),
                }
                .into()
            })
        })
        .transpose()
}

impl Config {
    /// Parse configuration from TOML content, applying process environment
    /// overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The TOML content is malformed
    /// - An environment override cannot be parsed
    /// - Validation fails (e.g., missing token, zero timeouts)
    #[allow(clippy::result_large_err)]
    pub fn parse_toml(content: &str) -> Result<Self> {
        Self::parse_toml_with_env(content, |key| std::env::var(key).ok())
    }

    /// Same as [`Config::parse_toml`] with an explicit environment lookup.
    ///
    /// # Errors
    ///
    /// See [`Config::parse_toml`].
    #[allow(clippy::result_large_err)]
    pub fn parse_toml_with_env<F>(content: &str, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;

        // Token comes from the environment only, never from the config file.
        config.telegram.bot_token = env_value(&env, TOKEN_ENV);
        if let Some(chat) = parse_env::<i64, _>(&env, AUDIT_CHAT_ENV)? {
            config.telegram.audit_chat_id = Some(chat);
        }
        if let Some(port) = parse_env::<u16, _>(&env, PORT_ENV)? {
            config.server.port = port;
        }
        if let Some(url) = env_value(&env, KEEPALIVE_ENV) {
            config.server.keepalive_url = Some(url);
        }

        config.validate()?;

        Ok(config)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be read
    /// - The TOML content is malformed
    /// - Validation fails
    #[allow(clippy::result_large_err)]
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::load_with_env(path, |key| std::env::var(key).ok())
    }

    /// Same as [`Config::load`] with an explicit environment lookup.
    ///
    /// # Errors
    ///
    /// See [`Config::load`].
    #[allow(clippy::result_large_err)]
    pub fn load_with_env<P, F>(path: P, env: F) -> Result<Self>
    where
        P: AsRef<Path>,
        F: Fn(&str) -> Option<String>,
    {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        Self::parse_toml_with_env(&content, env)
    }

    /// Load from `$RATEBOT_CONFIG`, else `config.toml`. A missing default
    /// file is treated as empty.
    ///
    /// # Errors
    ///
    /// See [`Config::load`].
    #[allow(clippy::result_large_err)]
    pub fn load_default() -> Result<Self> {
        match std::env::var(CONFIG_PATH_ENV) {
            Ok(path) => Self::load(path),
            Err(_) if Path::new(DEFAULT_CONFIG_PATH).exists() => Self::load(DEFAULT_CONFIG_PATH),
            Err(_) => Self::parse_toml(""),
        }
    }

    /// The validated bot token.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingField`] when `TELEGRAM_TOKEN` is unset.
    #[allow(clippy::result_large_err)]
    pub fn bot_token(&self) -> Result<&str> {
        self.telegram
            .bot_token
            .as_deref()
            .ok_or_else(|| ConfigError::MissingField { field: TOKEN_ENV }.into())
    }

    /// Initialize the tracing subscriber with this configuration's logging settings.
    pub fn init_logging(&self) {
        self.logging.init();
    }

    /// Validate configuration values.
    ///
    /// Checks that all required fields are present and values are within
    /// acceptable ranges.
    #[allow(clippy::result_large_err)]
    fn validate(&self) -> Result<()> {
        self.bot_token()?;

        if self.schedule.tick_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "tick_secs",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        self.schedule.quiet_hours()?;
        self.schedule.offset()?;

        if self.sources.aggregate_timeout_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "aggregate_timeout_ms",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        for (field, endpoint) in self.sources.endpoints() {
            if endpoint.url.is_empty() {
                return Err(ConfigError::MissingField { field }.into());
            }
            if endpoint.timeout_ms == 0 {
                return Err(ConfigError::InvalidValue {
                    field,
                    reason: "timeout_ms must be greater than 0".to_string(),
                }
                .into());
            }
        }

        if let Some(url) = &self.server.keepalive_url {
            url::Url::parse(url).map_err(|e| ConfigError::InvalidValue {
                field: "keepalive_url",
                reason: e.to_string(),
            })?;
        }
        if self.server.keepalive_interval_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "keepalive_interval_secs",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        if self.server.restart_delay_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "restart_delay_secs",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }

        Ok(())
    }
}
