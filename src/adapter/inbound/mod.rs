//! Inbound adapters (driving side).

pub mod health;
