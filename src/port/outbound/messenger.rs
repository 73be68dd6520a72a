//! Chat transport port.
//!
//! The application layer speaks in terms of chats, texts and abstract
//! keyboards; the Telegram adapter maps those onto Bot API calls.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::id::{ChatId, MessageRef};

/// How the chat platform should interpret message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextFormat {
    #[default]
    Plain,
    Html,
}

/// Keyboards the bot can attach to a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Markup {
    /// Persistent reply keyboard with the four main actions.
    MainMenu,
    /// Inline interval picker. The "turn off" row appears only when subscribed.
    IntervalPicker { subscribed: bool },
}

/// A message to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMessage {
    pub text: String,
    pub format: TextFormat,
    pub markup: Option<Markup>,
}

impl OutgoingMessage {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            format: TextFormat::Plain,
            markup: None,
        }
    }

    pub fn html(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            format: TextFormat::Html,
            markup: None,
        }
    }

    #[must_use]
    pub fn with_markup(mut self, markup: Markup) -> Self {
        self.markup = Some(markup);
        self
    }
}

/// Failure reported by the chat platform for one outbound call.
///
/// Only the text is kept; callers inspect it to tell a recipient that is
/// gone for good from a transient failure.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct DeliveryError {
    message: String,
}

impl DeliveryError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// True when the recipient blocked the bot or the account was deactivated.
    #[must_use]
    pub fn is_recipient_gone(&self) -> bool {
        let lower = self.message.to_lowercase();
        lower.contains("blocked") || lower.contains("deactivated")
    }
}

/// Outbound side of the chat platform.
#[async_trait]
pub trait Messenger: Send + Sync {
    /// Send a new message and return a handle for later edits.
    async fn send(
        &self,
        chat: ChatId,
        message: OutgoingMessage,
    ) -> Result<MessageRef, DeliveryError>;

    /// Replace the text of a previously sent message.
    async fn edit(
        &self,
        chat: ChatId,
        message: MessageRef,
        text: String,
        format: TextFormat,
    ) -> Result<(), DeliveryError>;

    /// Acknowledge a button press with a short toast.
    async fn answer_callback(&self, callback_id: &str, text: &str) -> Result<(), DeliveryError>;
}
