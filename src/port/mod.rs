//! Trait definitions (hexagonal ports). Depend only on domain.
//!
//! Ports are the seams between the application layer and the outside
//! world. Adapters implement them; tests swap in the fakes from
//! `testkit`.
//!
//! ```text
//!                  ┌─────────────────────────┐
//!                  │       Application       │
//!                  │  aggregator, scheduler, │
//!                  │     request handler     │
//!                  └───────────┬─────────────┘
//!          ┌───────────────────┼───────────────────┐
//!          ▼                   ▼                   ▼
//!   ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//!   │ RateSource  │     │  Messenger  │     │    Clock    │
//!   │ (HTTP feeds)│     │  (Telegram) │     │ (local time)│
//!   └─────────────┘     └─────────────┘     └─────────────┘
//! ```

pub mod outbound;

pub use outbound::clock::{Clock, SystemClock};
pub use outbound::messenger::{DeliveryError, Markup, Messenger, OutgoingMessage, TextFormat};
pub use outbound::source::{QuoteFetcher, RateSource};
