//! Application services (use cases).
//!
//! These services own the in-memory stores and coordinate the ports:
//! aggregation of rate sources, periodic delivery to subscribers, and the
//! per-command request handler.

pub mod aggregator;
pub mod audit;
pub mod handler;
pub mod registry;
pub mod render;
pub mod scheduler;
pub mod usage;
