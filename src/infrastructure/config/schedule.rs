//! Scheduler, quiet hours and local time zone settings.

use std::time::Duration;

use chrono::{FixedOffset, NaiveTime};
use serde::Deserialize;

use crate::application::render::SummaryStyle;
use crate::domain::schedule::QuietHours;
use crate::error::{ConfigError, Result};

const TIME_FORMAT: &str = "%H:%M";

#[derive(Debug, Clone, Deserialize)]
pub struct ScheduleConfig {
    /// Scheduler wake period in seconds.
    #[serde(default = "default_tick_secs")]
    pub tick_secs: u64,
    /// Quiet window start, `HH:MM` local time.
    #[serde(default = "default_quiet_start")]
    pub quiet_start: String,
    /// Quiet window end, `HH:MM` local time. Daily deliveries align to it.
    #[serde(default = "default_quiet_end")]
    pub quiet_end: String,
    /// Offset of the bot's local time from UTC, in whole hours.
    #[serde(default = "default_utc_offset_hours")]
    pub utc_offset_hours: i32,
    /// Label printed after local timestamps.
    #[serde(default = "default_zone_label")]
    pub zone_label: String,
    /// Closing lines appended to every summary (raw HTML).
    #[serde(default)]
    pub footer: Option<String>,
}

const fn default_tick_secs() -> u64 {
    60
}

fn default_quiet_start() -> String {
    "23:00".to_string()
}

fn default_quiet_end() -> String {
    "08:00".to_string()
}

const fn default_utc_offset_hours() -> i32 {
    3
}

fn default_zone_label() -> String {
    "МСК".to_string()
}

fn parse_time(field: &'static str, value: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(value.trim(), TIME_FORMAT).map_err(|e| {
        ConfigError::InvalidValue {
            field,
            reason: format!("expected HH:MM, got {value:?} ({e})"),
        }
        .into()
    })
}

impl ScheduleConfig {
    #[must_use]
    pub fn tick(&self) -> Duration {
        Duration::from_secs(self.tick_secs)
    }

    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] for a malformed bound.
    pub fn quiet_hours(&self) -> Result<QuietHours> {
        Ok(QuietHours::new(
            parse_time("quiet_start", &self.quiet_start)?,
            parse_time("quiet_end", &self.quiet_end)?,
        ))
    }

    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] outside UTC-12..=UTC+14.
    pub fn offset(&self) -> Result<FixedOffset> {
        if !(-12..=14).contains(&self.utc_offset_hours) {
            return Err(ConfigError::InvalidValue {
                field: "utc_offset_hours",
                reason: "must be between -12 and 14".to_string(),
            }
            .into());
        }
        FixedOffset::east_opt(self.utc_offset_hours * 3600).ok_or_else(|| {
            ConfigError::InvalidValue {
                field: "utc_offset_hours",
                reason: "not a valid offset".to_string(),
            }
            .into()
        })
    }

    #[must_use]
    pub fn summary_style(&self) -> SummaryStyle {
        SummaryStyle {
            zone_label: self.zone_label.clone(),
            footer: self.footer.clone().filter(|f| !f.trim().is_empty()),
        }
    }
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            tick_secs: default_tick_secs(),
            quiet_start: default_quiet_start(),
            quiet_end: default_quiet_end(),
            utc_offset_hours: default_utc_offset_hours(),
            zone_label: default_zone_label(),
            footer: None,
        }
    }
}
