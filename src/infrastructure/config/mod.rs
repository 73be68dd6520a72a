//! Infrastructure configuration modules.

pub mod logging;
pub mod schedule;
pub mod server;
pub mod settings;
pub mod telegram;
