//! Upbit USDT/KRW ticker.

use async_trait::async_trait;
use reqwest::Client as HttpClient;
use rust_decimal::Decimal;
use serde::Deserialize;

use super::get_text;
use super::settings::EndpointConfig;
use crate::domain::rate::{Quote, SourceId};
use crate::error::{Error, Result};
use crate::port::outbound::source::QuoteFetcher;

#[derive(Debug, Deserialize)]
struct Ticker {
    trade_price: Decimal,
}

/// Last trade price of the `KRW-USDT` market.
pub struct UpbitFetcher {
    http: HttpClient,
    endpoint: EndpointConfig,
}

impl UpbitFetcher {
    pub fn new(http: HttpClient, endpoint: EndpointConfig) -> Self {
        Self { http, endpoint }
    }
}

#[async_trait]
impl QuoteFetcher for UpbitFetcher {
    fn source(&self) -> SourceId {
        SourceId::Upbit
    }

    async fn fetch_quote(&self) -> Result<Quote> {
        let body = get_text(&self.http, &self.endpoint.url, self.endpoint.timeout()).await?;
        parse_ticker(&body)
    }
}

/// The endpoint answers with an array of tickers; the first one is ours.
fn parse_ticker(body: &str) -> Result<Quote> {
    let tickers: Vec<Ticker> = serde_json::from_str(body)?;
    let ticker = tickers
        .into_iter()
        .next()
        .ok_or_else(|| Error::upstream(SourceId::Upbit, "empty ticker list"))?;
    Ok(Quote::Price(ticker.trade_price))
}
