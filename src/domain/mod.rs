//! Transport-agnostic domain types.
//!
//! Nothing in here knows about HTTP or the chat platform: rates, chat
//! identities, subscriptions, quiet hours and usage counters are plain
//! values that the application layer moves between stores and ports.

pub mod id;
pub mod money;
pub mod rate;
pub mod schedule;
pub mod subscription;
pub mod usage;
