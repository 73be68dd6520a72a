//! Telegram chat transport.
//!
//! [`TelegramMessenger`] implements the [`Messenger`] port on top of a
//! `teloxide` bot; [`dispatch`] runs the long-polling loop that turns
//! updates into [`Command`]s and interval choices for the
//! [`RequestHandler`].
//!
//! [`Messenger`]: crate::port::Messenger
//! [`Command`]: crate::application::handler::Command
//! [`RequestHandler`]: crate::application::handler::RequestHandler

pub mod command;
pub mod dispatch;
pub mod keyboard;
pub mod messenger;

pub use dispatch::run_dispatcher;
pub use messenger::TelegramMessenger;
