//! ABCEX USDT/RUB order book top.

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
struct Depth {
    #[serde(default)]
    ask: Option<Vec<Level>>,
    #[serde(default)]
    bid: Option<Vec<Level>>,
}

#[derive(Debug, Deserialize)]
struct Level {
    price: Decimal,
}

/// Best bid (what buyers pay for USDT) and best ask (what sellers want).
pub struct AbcexFetcher {
    http: HttpClient,
    endpoint: EndpointConfig,
}

impl AbcexFetcher {
    pub fn new(http: HttpClient, endpoint: EndpointConfig) -> Self {
        Self { http, endpoint }
    }
}

#[async_trait]
impl QuoteFetcher for AbcexFetcher {
    fn source(&self) -> SourceId {
        SourceId::Abcex
    }

    async fn fetch_quote(&self) -> Result<Quote> {
        let body = get_text(&self.http, &self.endpoint.url, self.endpoint.timeout()).await?;
        parse_depth(&body)
    }
}

fn parse_depth(body: &str) -> Result<Quote> {
    let depth: Depth = serde_json::from_str(body)?;
    let best = |side: Option<Vec<Level>>| side.and_then(|levels| levels.into_iter().next());

    match (best(depth.bid), best(depth.ask)) {
        (Some(bid), Some(ask)) => Ok(Quote::BidAsk {
            bid: bid.price,
            ask: ask.price,
        }),
        _ => Err(Error::upstream(SourceId::Abcex, "empty order book")),
    }
}
