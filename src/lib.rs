//! Ratebot - USDT/KRW/RUB rate bot for Telegram.
//!
//! Fetches the USDT price in won from Upbit and Bithumb, the won to ruble
//! conversion, and the ABCEX USDT/RUB order book top, then answers chat
//! users on demand or on a per-chat schedule.
//!
//! # Architecture
//!
//! The crate follows a hexagonal layout:
//!
//! - [`domain`] - Rates, identities, subscriptions, quiet hours
//! - [`port`] - Traits the application depends on (`RateSource`,
//!   `Messenger`, `Clock`)
//! - [`application`] - Aggregation, scheduling, request handling, rendering
//! - [`adapter`] - HTTP rate sources, Telegram transport, liveness endpoint
//! - [`infrastructure`] - Configuration, wiring, task supervision
//! - [`error`] - Error types for the crate
//!
//! # Features
//!
//! - `testkit` - Export the fakes in `testkit` to integration tests

pub mod adapter;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod port;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;
