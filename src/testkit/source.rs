//! Scripted rate sources.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;

use crate::domain::rate::{Quote, RateSnapshot, SourceId};
use crate::error::{Error, Result};
use crate::port::outbound::source::{QuoteFetcher, RateSource};

/// [`QuoteFetcher`] that replays queued outcomes, one per call.
///
/// An empty queue behaves like an upstream failure.
pub struct ScriptedFetcher {
    source: SourceId,
    script: Mutex<VecDeque<std::result::Result<Quote, String>>>,
    calls: Arc<AtomicUsize>,
}

impl ScriptedFetcher {
    #[must_use]
    pub fn new(source: SourceId) -> Self {
        Self {
            source,
            script: Mutex::new(VecDeque::new()),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn push_ok(&self, quote: Quote) {
        self.script.lock().push_back(Ok(quote));
    }

    pub fn push_err(&self, reason: &str) {
        self.script.lock().push_back(Err(reason.to_string()));
    }

    /// Shared counter of `fetch_quote` calls.
    #[must_use]
    pub fn calls(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }
}

#[async_trait]
impl QuoteFetcher for ScriptedFetcher {
    fn source(&self) -> SourceId {
        self.source
    }

    async fn fetch_quote(&self) -> Result<Quote> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.script.lock().pop_front() {
            Some(Ok(quote)) => Ok(quote),
            Some(Err(reason)) => Err(Error::upstream(self.source, reason)),
            None => Err(Error::upstream(self.source, "no scripted response")),
        }
    }
}

/// [`RateSource`] returning a settable value, optionally after a delay.
pub struct ScriptedSource {
    source: SourceId,
    current: Mutex<Option<Quote>>,
    cached: Mutex<Option<Quote>>,
    delay: Duration,
    calls: AtomicUsize,
}

impl ScriptedSource {
    #[must_use]
    pub fn new(source: SourceId, quote: Option<Quote>) -> Self {
        Self {
            source,
            current: Mutex::new(quote),
            cached: Mutex::new(None),
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
        }
    }

    /// Sleep this long inside every `fetch`.
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Value reported by `cached()`.
    #[must_use]
    pub fn with_cached(self, quote: Quote) -> Self {
        *self.cached.lock() = Some(quote);
        self
    }

    pub fn set(&self, quote: Option<Quote>) {
        *self.current.lock() = quote;
    }

    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RateSource for ScriptedSource {
    fn source(&self) -> SourceId {
        self.source
    }

    async fn fetch(&self) -> Option<RateSnapshot> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        let quote = *self.current.lock();
        quote.map(|q| RateSnapshot::new(self.source, q, Utc::now()))
    }

    fn cached(&self) -> Option<RateSnapshot> {
        let quote = *self.cached.lock();
        quote.map(|q| RateSnapshot::new(self.source, q, Utc::now()).stale())
    }
}
