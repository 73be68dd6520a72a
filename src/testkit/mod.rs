//! Shared test utilities available to both unit and integration tests.
//!
//! Enabled via `#[cfg(test)]` (unit tests) or the `testkit` feature
//! (integration tests).
//!
//! # Modules
//!
//! - [`source`] - Scripted [`QuoteFetcher`](crate::port::QuoteFetcher) and
//!   [`RateSource`](crate::port::RateSource) fakes.
//! - [`messenger`] - `RecordingMessenger`, a [`Messenger`](crate::port::Messenger)
//!   that records every call and can fail chosen chats.
//! - [`clock`] - `ManualClock` plus helpers for local timestamps.

pub mod clock;
pub mod messenger;
pub mod source;
