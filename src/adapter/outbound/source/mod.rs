//! Upstream rate source adapters.
//!
//! Each fetcher performs one HTTP call and parses one value. The
//! [`CachedSource`] wrapper turns a fetcher into a [`RateSource`]: it keeps
//! the last good snapshot, serves it when a refresh fails, and optionally
//! refuses to refresh more often than a fixed window.

mod abcex;
mod bithumb;
mod krw_rub;
mod upbit;

pub mod settings;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use reqwest::Client as HttpClient;
use tracing::{debug, warn};

pub use abcex::AbcexFetcher;
pub use bithumb::BithumbFetcher;
pub use krw_rub::KrwRubFetcher;
pub use upbit::UpbitFetcher;

use self::settings::SourcesConfig;
use crate::domain::rate::{RateSnapshot, SourceId};
use crate::error::Result;
use crate::port::outbound::source::{QuoteFetcher, RateSource};

/// Build the shared HTTP client for upstream calls.
#[must_use]
pub fn http_client(config: &SourcesConfig) -> HttpClient {
    HttpClient::builder()
        .user_agent(config.user_agent.clone())
        .connect_timeout(Duration::from_secs(3))
        .build()
        .unwrap_or_else(|err| {
            warn!(error = %err, "Failed to build HTTP client, using defaults");
            HttpClient::new()
        })
}

/// Build every configured source, wrapped with its cache policy.
#[must_use]
pub fn build_sources(config: &SourcesConfig, http: &HttpClient) -> Vec<Arc<dyn RateSource>> {
    vec![
        Arc::new(CachedSource::new(
            UpbitFetcher::new(http.clone(), config.upbit.clone()),
            config.upbit.min_age(),
        )),
        Arc::new(CachedSource::new(
            BithumbFetcher::new(http.clone(), config.bithumb.clone()),
            config.bithumb.min_age(),
        )),
        Arc::new(CachedSource::new(
            KrwRubFetcher::new(http.clone(), config.krw_rub.clone()),
            config.krw_rub.min_age(),
        )),
        Arc::new(CachedSource::new(
            AbcexFetcher::new(http.clone(), config.abcex.clone()),
            config.abcex.min_age(),
        )),
    ]
}

/// GET `url` and return the body of a successful response.
pub(crate) async fn get_text(http: &HttpClient, url: &str, timeout: Duration) -> Result<String> {
    let response = http
        .get(url)
        .timeout(timeout)
        .send()
        .await?
        .error_for_status()?;
    Ok(response.text().await?)
}

/// A fetcher plus its last known-good snapshot.
pub struct CachedSource<F> {
    fetcher: F,
    min_age: Option<chrono::Duration>,
    cache: Mutex<Option<RateSnapshot>>,
}

impl<F: QuoteFetcher> CachedSource<F> {
    pub fn new(fetcher: F, min_age: Option<chrono::Duration>) -> Self {
        Self {
            fetcher,
            min_age,
            cache: Mutex::new(None),
        }
    }
}

#[async_trait]
impl<F: QuoteFetcher> RateSource for CachedSource<F> {
    fn source(&self) -> SourceId {
        self.fetcher.source()
    }

    async fn fetch(&self) -> Option<RateSnapshot> {
        let source = self.fetcher.source();
        let cached = *self.cache.lock();

        if let (Some(snapshot), Some(min_age)) = (cached, self.min_age) {
            if snapshot.age(Utc::now()) < min_age {
                debug!(%source, "Serving cached rate inside refresh window");
                return Some(snapshot);
            }
        }

        match self.fetcher.fetch_quote().await {
            Ok(quote) if quote.is_valid() => {
                let snapshot = RateSnapshot::new(source, quote, Utc::now());
                *self.cache.lock() = Some(snapshot);
                debug!(%source, ?quote, "Fetched rate");
                Some(snapshot)
            }
            Ok(quote) => {
                warn!(%source, ?quote, "Discarding non-positive rate");
                cached.map(RateSnapshot::stale)
            }
            Err(err) => {
                warn!(%source, error = %err, has_cache = cached.is_some(), "Rate fetch failed");
                cached.map(RateSnapshot::stale)
            }
        }
    }

    fn cached(&self) -> Option<RateSnapshot> {
        *self.cache.lock()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::rate::Quote;
    use crate::testkit::source::ScriptedFetcher;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn failure_without_cache_is_unavailable() {
        let fetcher = ScriptedFetcher::new(SourceId::Upbit);
        fetcher.push_err("connection refused");
        let source = CachedSource::new(fetcher, None);

        assert!(source.fetch().await.is_none());
        assert!(source.cached().is_none());
    }

    #[tokio::test]
    async fn failure_with_cache_returns_previous_value() {
        let fetcher = ScriptedFetcher::new(SourceId::Bithumb);
        fetcher.push_ok(Quote::Price(dec!(1461)));
        fetcher.push_err("timeout");
        let source = CachedSource::new(fetcher, None);

        let first = source.fetch().await.unwrap();
        let second = source.fetch().await.unwrap();

        assert!(first.fresh);
        assert!(!second.fresh);
        assert_eq!(second.quote, Quote::Price(dec!(1461)));
        assert_eq!(second.fetched_at, first.fetched_at);
    }

    #[tokio::test]
    async fn success_replaces_cache() {
        let fetcher = ScriptedFetcher::new(SourceId::Upbit);
        fetcher.push_ok(Quote::Price(dec!(1450)));
        fetcher.push_ok(Quote::Price(dec!(1455)));
        let source = CachedSource::new(fetcher, None);

        source.fetch().await;
        let latest = source.fetch().await.unwrap();

        assert_eq!(latest.quote, Quote::Price(dec!(1455)));
        assert_eq!(source.cached().unwrap().quote, Quote::Price(dec!(1455)));
    }

    #[tokio::test]
    async fn non_positive_value_is_treated_as_failure() {
        let fetcher = ScriptedFetcher::new(SourceId::Upbit);
        fetcher.push_ok(Quote::Price(dec!(1450)));
        fetcher.push_ok(Quote::Price(dec!(0)));
        let source = CachedSource::new(fetcher, None);

        source.fetch().await;
        let second = source.fetch().await.unwrap();

        assert_eq!(second.quote, Quote::Price(dec!(1450)));
        assert!(!second.fresh);
    }

    #[tokio::test]
    async fn refresh_window_limits_network_calls() {
        let fetcher = ScriptedFetcher::new(SourceId::Abcex);
        let calls = fetcher.calls();
        fetcher.push_ok(Quote::BidAsk {
            bid: dec!(95.10),
            ask: dec!(96.40),
        });
        fetcher.push_ok(Quote::BidAsk {
            bid: dec!(90),
            ask: dec!(91),
        });
        let source = CachedSource::new(fetcher, Some(chrono::Duration::minutes(5)));

        let first = source.fetch().await.unwrap();
        let second = source.fetch().await.unwrap();

        assert_eq!(first, second);
        assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn refresh_window_does_not_apply_without_cache() {
        let fetcher = ScriptedFetcher::new(SourceId::KrwRub);
        let calls = fetcher.calls();
        fetcher.push_err("upstream down");
        fetcher.push_ok(Quote::Price(dec!(62345.67)));
        let source = CachedSource::new(fetcher, Some(chrono::Duration::minutes(30)));

        assert!(source.fetch().await.is_none());
        assert_eq!(
            source.fetch().await.unwrap().quote,
            Quote::Price(dec!(62345.67))
        );
        assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 2);
    }
}
