//! Bithumb USDT/KRW ticker.

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
struct TickerResponse {
    status: Option<String>,
    data: Option<TickerData>,
}

#[derive(Debug, Deserialize)]
struct TickerData {
    closing_price: Decimal,
}

/// Closing price of `USDT_KRW`.
pub struct BithumbFetcher {
    http: HttpClient,
    endpoint: EndpointConfig,
}

impl BithumbFetcher {
    pub fn new(http: HttpClient, endpoint: EndpointConfig) -> Self {
        Self { http, endpoint }
    }
}

#[async_trait]
impl QuoteFetcher for BithumbFetcher {
    fn source(&self) -> SourceId {
        SourceId::Bithumb
    }

    async fn fetch_quote(&self) -> Result<Quote> {
        let body = get_text(&self.http, &self.endpoint.url, self.endpoint.timeout()).await?;
        parse_ticker(&body)
    }
}

fn parse_ticker(body: &str) -> Result<Quote> {
    let response: TickerResponse = serde_json::from_str(body)?;
    match response.data {
        Some(data) => Ok(Quote::Price(data.closing_price)),
        None => Err(Error::upstream(
            SourceId::Bithumb,
            format!(
                "no ticker data (status {})",
                response.status.as_deref().unwrap_or("unknown")
            ),
        )),
    }
}
