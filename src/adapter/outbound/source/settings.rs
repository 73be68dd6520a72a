//! Upstream rate source configuration.

use std::time::Duration;

use serde::Deserialize;

/// One upstream endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EndpointConfig {
    /// Full request URL, query string included.
    pub url: String,
    /// Secondary URL consulted when the primary fails (KRW→RUB only).
    #[serde(default)]
    pub fallback_url: Option<String>,
    /// Per-request timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// Do not re-fetch while the cached value is younger than this (0 = always fetch).
    #[serde(default)]
    pub min_age_secs: u64,
}

impl EndpointConfig {
    fn new(url: &str, timeout_ms: u64, min_age_secs: u64) -> Self {
        Self {
            url: url.to_string(),
            fallback_url: None,
            timeout_ms,
            min_age_secs,
        }
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Minimum cache age, or `None` when the source always re-fetches.
    #[must_use]
    pub fn min_age(&self) -> Option<chrono::Duration> {
        if self.min_age_secs == 0 {
            return None;
        }
        i64::try_from(self.min_age_secs)
            .ok()
            .and_then(chrono::Duration::try_seconds)
    }
}

const fn default_timeout_ms() -> u64 {
    4_000
}

/// Settings for every rate source plus the aggregation bound.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SourcesConfig {
    /// `User-Agent` sent with every upstream request.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Outer bound on a single source call inside one aggregation, in milliseconds.
    #[serde(default = "default_aggregate_timeout_ms")]
    pub aggregate_timeout_ms: u64,
    #[serde(default = "default_upbit")]
    pub upbit: EndpointConfig,
    #[serde(default = "default_bithumb")]
    pub bithumb: EndpointConfig,
    #[serde(default = "default_krw_rub")]
    pub krw_rub: EndpointConfig,
    #[serde(default = "default_abcex")]
    pub abcex: EndpointConfig,
}

impl SourcesConfig {
    #[must_use]
    pub fn aggregate_timeout(&self) -> Duration {
        Duration::from_millis(self.aggregate_timeout_ms)
    }

    /// All endpoints with their config key, for validation.
    #[must_use]
    pub fn endpoints(&self) -> [(&'static str, &EndpointConfig); 4] {
        [
            ("sources.upbit", &self.upbit),
            ("sources.bithumb", &self.bithumb),
            ("sources.krw_rub", &self.krw_rub),
            ("sources.abcex", &self.abcex),
        ]
    }
}

fn default_user_agent() -> String {
    "Mozilla/5.0".to_string()
}

const fn default_aggregate_timeout_ms() -> u64 {
    8_000
}

fn default_upbit() -> EndpointConfig {
    EndpointConfig::new("https://api.upbit.com/v1/ticker?markets=KRW-USDT", 4_000, 0)
}

fn default_bithumb() -> EndpointConfig {
    EndpointConfig::new("https://api.bithumb.com/public/ticker/USDT_KRW", 4_000, 0)
}

fn default_krw_rub() -> EndpointConfig {
    EndpointConfig {
        fallback_url: Some("https://open.er-api.com/v6/latest/RUB".to_string()),
        ..EndpointConfig::new("https://www.google.com/finance/quote/RUB-KRW?hl=en", 5_000, 1_800)
    }
}

fn default_abcex() -> EndpointConfig {
    EndpointConfig::new(
        "https://hub.abcex.io/api/v2/exchange/public/orderbook/depth?instrumentCode=USDTRUB&lang=ru",
        4_000,
        15,
    )
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            aggregate_timeout_ms: default_aggregate_timeout_ms(),
            upbit: default_upbit(),
            bithumb: default_bithumb(),
            krw_rub: default_krw_rub(),
            abcex: default_abcex(),
        }
    }
}
