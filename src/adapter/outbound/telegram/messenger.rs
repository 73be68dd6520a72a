//! Bot API implementation of the [`Messenger`] port.

use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::{MessageId, ParseMode};
use teloxide::RequestError;
use tracing::debug;

use crate::domain::id::{ChatId, MessageRef};
use crate::port::outbound::messenger::{
    DeliveryError, Messenger, OutgoingMessage, TextFormat,
};

use super::keyboard::reply_markup;

/// [`Messenger`] backed by a `teloxide` [`Bot`].
#[derive(Clone)]
pub struct TelegramMessenger {
    bot: Bot,
}

impl TelegramMessenger {
    #[must_use]
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

fn delivery_error(err: RequestError) -> DeliveryError {
    DeliveryError::new(err.to_string())
}

const fn parse_mode(format: TextFormat) -> Option<ParseMode> {
    match format {
        TextFormat::Plain => None,
        TextFormat::Html => Some(ParseMode::Html),
    }
}

#[async_trait]
impl Messenger for TelegramMessenger {
    async fn send(
        &self,
        chat: ChatId,
        message: OutgoingMessage,
    ) -> Result<MessageRef, DeliveryError> {
        let mut request = self
            .bot
            .send_message(teloxide::types::ChatId(chat.0), message.text);
        if let Some(mode) = parse_mode(message.format) {
            request = request.parse_mode(mode);
        }
        if let Some(markup) = message.markup {
            request = request.reply_markup(reply_markup(markup));
        }

        let sent = request.await.map_err(delivery_error)?;
        debug!(chat_id = chat.0, message_id = sent.id.0, "Message sent");
        Ok(MessageRef(sent.id.0))
    }

    async fn edit(
        &self,
        chat: ChatId,
        message: MessageRef,
        text: String,
        format: TextFormat,
    ) -> Result<(), DeliveryError> {
        let mut request = self.bot.edit_message_text(
            teloxide::types::ChatId(chat.0),
            MessageId(message.0),
            text,
        );
        if let Some(mode) = parse_mode(format) {
            request = request.parse_mode(mode);
        }

        request.await.map_err(delivery_error)?;
        Ok(())
    }

    async fn answer_callback(&self, callback_id: &str, text: &str) -> Result<(), DeliveryError> {
        self.bot
            .answer_callback_query(callback_id.to_string())
            .text(text)
            .await
            .map_err(delivery_error)?;
        Ok(())
    }
}
