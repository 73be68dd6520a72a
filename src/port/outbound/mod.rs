//! Outbound ports (driven side): interfaces implemented by outbound adapters.
//!
//! These contracts describe the external collaborators: upstream price
//! feeds, the chat transport and the wall clock.

pub mod clock;
pub mod messenger;
pub mod source;
