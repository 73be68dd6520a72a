//! Roubles per one million won.
//!
//! Primary: the RUB-KRW quote page of a finance site, read from the
//! rendered price element. Fallback: a free currency-conversion API.
//! Both report won per rouble; the adapter inverts and scales.

use std::collections::HashMap;
use std::str::FromStr;
use std::sync::OnceLock;

use async_trait::async_trait;
use regex::Regex;
use reqwest::Client as HttpClient;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::warn;

use super::get_text;
use super::settings::EndpointConfig;
use crate::domain::rate::{Quote, SourceId};
use crate::error::{Error, Result};
use crate::port::outbound::source::QuoteFetcher;

const MILLION: Decimal = Decimal::from_parts(1_000_000, 0, 0, false, 0);

fn price_element() -> &'static Regex {
    static PRICE: OnceLock<Regex> = OnceLock::new();
    PRICE.get_or_init(|| {
        Regex::new(r#"<div[^>]*class="YMlKec fxKbKc"[^>]*>\s*([^<]+?)\s*</div>"#)
            .expect("price element pattern is valid")
    })
}

#[derive(Debug, Deserialize)]
struct ConversionResponse {
    result: Option<String>,
    #[serde(default)]
    rates: HashMap<String, Decimal>,
}

pub struct KrwRubFetcher {
    http: HttpClient,
    endpoint: EndpointConfig,
}

impl KrwRubFetcher {
    pub fn new(http: HttpClient, endpoint: EndpointConfig) -> Self {
        Self { http, endpoint }
    }

    async fn fetch_primary(&self) -> Result<Quote> {
        let body = get_text(&self.http, &self.endpoint.url, self.endpoint.timeout()).await?;
        parse_quote_page(&body)
    }

    async fn fetch_fallback(&self, url: &str) -> Result<Quote> {
        let body = get_text(&self.http, url, self.endpoint.timeout()).await?;
        parse_conversion(&body)
    }
}

#[async_trait]
impl QuoteFetcher for KrwRubFetcher {
    fn source(&self) -> SourceId {
        SourceId::KrwRub
    }

    async fn fetch_quote(&self) -> Result<Quote> {
        let primary_err = match self.fetch_primary().await {
            Ok(quote) => return Ok(quote),
            Err(err) => err,
        };

        let Some(fallback_url) = self.endpoint.fallback_url.as_deref() else {
            return Err(primary_err);
        };

        warn!(error = %primary_err, "Quote page unavailable, using conversion API");
        self.fetch_fallback(fallback_url).await
    }
}

/// Convert "won per rouble" into "roubles per million won".
fn per_million_won(krw_per_rub: Decimal) -> Result<Quote> {
    if krw_per_rub <= Decimal::ZERO {
        return Err(Error::upstream(
            SourceId::KrwRub,
            format!("non-positive rate {krw_per_rub}"),
        ));
    }
    MILLION
        .checked_div(krw_per_rub)
        .map(Quote::Price)
        .ok_or_else(|| Error::upstream(SourceId::KrwRub, "rate out of range"))
}

fn parse_quote_page(html: &str) -> Result<Quote> {
    let raw = price_element()
        .captures(html)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .ok_or_else(|| Error::upstream(SourceId::KrwRub, "price element not found"))?;

    let cleaned: String = raw
        .chars()
        .filter(|c| *c != ',' && *c != '₩' && !c.is_whitespace())
        .collect();
    let krw_per_rub = Decimal::from_str(&cleaned)
        .map_err(|err| Error::Parse(format!("quote page value {raw:?}: {err}")))?;

    per_million_won(krw_per_rub)
}

fn parse_conversion(body: &str) -> Result<Quote> {
    let response: ConversionResponse = serde_json::from_str(body)?;
    if response.result.as_deref() != Some("success") {
        return Err(Error::upstream(
            SourceId::KrwRub,
            format!(
                "conversion API result {}",
                response.result.as_deref().unwrap_or("missing")
            ),
        ));
    }

    let krw_per_rub = response
        .rates
        .get("KRW")
        .copied()
        .ok_or_else(|| Error::upstream(SourceId::KrwRub, "conversion API has no KRW rate"))?;

    per_million_won(krw_per_rub)
}
