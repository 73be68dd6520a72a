//! Recording chat transport.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::domain::id::{ChatId, MessageRef};
use crate::port::outbound::messenger::{DeliveryError, Messenger, OutgoingMessage, TextFormat};

/// One call made through the messenger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Sent {
        chat: ChatId,
        message: OutgoingMessage,
    },
    Edited {
        chat: ChatId,
        message: MessageRef,
        text: String,
        format: TextFormat,
    },
    Answered {
        callback_id: String,
        text: String,
    },
}

#[derive(Default)]
struct State {
    calls: Vec<Call>,
    failures: HashMap<ChatId, String>,
    next_id: i32,
}

/// [`Messenger`] that records every call.
///
/// Sends and edits to chats registered with [`RecordingMessenger::fail_chat`]
/// return a [`DeliveryError`] with the given text and are not recorded.
#[derive(Default)]
pub struct RecordingMessenger {
    state: Mutex<State>,
}

impl RecordingMessenger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_chat(&self, chat: ChatId, error: &str) {
        self.state.lock().failures.insert(chat, error.to_string());
    }

    pub fn clear_failures(&self) {
        self.state.lock().failures.clear();
    }

    #[must_use]
    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().calls.clone()
    }

    /// Messages sent to `chat`, in order.
    #[must_use]
    pub fn sent_to(&self, chat: ChatId) -> Vec<OutgoingMessage> {
        self.state
            .lock()
            .calls
            .iter()
            .filter_map(|call| match call {
                Call::Sent { chat: c, message } if *c == chat => Some(message.clone()),
                _ => None,
            })
            .collect()
    }

    /// Texts of edits applied in `chat`, in order.
    #[must_use]
    pub fn edits_in(&self, chat: ChatId) -> Vec<(String, TextFormat)> {
        self.state
            .lock()
            .calls
            .iter()
            .filter_map(|call| match call {
                Call::Edited {
                    chat: c,
                    text,
                    format,
                    ..
                } if *c == chat => Some((text.clone(), *format)),
                _ => None,
            })
            .collect()
    }

    /// Callback acknowledgements, in order.
    #[must_use]
    pub fn answers(&self) -> Vec<(String, String)> {
        self.state
            .lock()
            .calls
            .iter()
            .filter_map(|call| match call {
                Call::Answered { callback_id, text } => Some((callback_id.clone(), text.clone())),
                _ => None,
            })
            .collect()
    }
}

#[async_trait]
impl Messenger for RecordingMessenger {
    async fn send(
        &self,
        chat: ChatId,
        message: OutgoingMessage,
    ) -> Result<MessageRef, DeliveryError> {
        let mut state = self.state.lock();
        if let Some(error) = state.failures.get(&chat) {
            return Err(DeliveryError::new(error.clone()));
        }
        state.next_id += 1;
        let id = MessageRef(state.next_id);
        state.calls.push(Call::Sent { chat, message });
        Ok(id)
    }

    async fn edit(
        &self,
        chat: ChatId,
        message: MessageRef,
        text: String,
        format: TextFormat,
    ) -> Result<(), DeliveryError> {
        let mut state = self.state.lock();
        if let Some(error) = state.failures.get(&chat) {
            return Err(DeliveryError::new(error.clone()));
        }
        state.calls.push(Call::Edited {
            chat,
            message,
            text,
            format,
        });
        Ok(())
    }

    async fn answer_callback(&self, callback_id: &str, text: &str) -> Result<(), DeliveryError> {
        self.state.lock().calls.push(Call::Answered {
            callback_id: callback_id.to_string(),
            text: text.to_string(),
        });
        Ok(())
    }
}
