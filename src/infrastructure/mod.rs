//! Infrastructure layer.
//!
//! Technical concerns that support the application without containing
//! business logic: configuration, wiring and background task supervision.
//!
//! # Submodules
//!
//! - [`bootstrap`] - Composition root for runtime wiring
//! - [`config`] - Configuration loading and validation
//! - [`keepalive`] - Periodic self-ping
//! - [`supervisor`] - Restart-on-exit task supervision

pub mod bootstrap;
pub mod config;
pub mod keepalive;
pub mod supervisor;
