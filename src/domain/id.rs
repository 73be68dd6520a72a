//! Chat-side identifier types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Chat identifier - a private chat, group or channel.
///
/// Channel and group ids are negative on the chat platform, hence `i64`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChatId(pub i64);

impl fmt::Display for ChatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// User identifier - the person behind a message or button press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UserId(pub u64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque handle to a message already delivered, used for later edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MessageRef(pub i32);

/// Who sent an inbound command, and where to answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Requester {
    pub user: UserId,
    pub chat: ChatId,
    pub username: Option<String>,
    pub first_name: String,
    pub last_name: Option<String>,
}

impl Requester {
    /// Nickname shown in the profile card.
    ///
    /// `@username` when set, otherwise the full name, otherwise a placeholder.
    #[must_use]
    pub fn display_name(&self) -> String {
        if let Some(username) = self.username.as_deref().filter(|u| !u.is_empty()) {
            return format!("@{username}");
        }

        let full_name = [Some(self.first_name.as_str()), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ");

        if full_name.is_empty() {
            "без имени".to_string()
        } else {
            full_name
        }
    }

    /// Short handle used in audit lines.
    #[must_use]
    pub fn audit_handle(&self) -> String {
        match self.username.as_deref().filter(|u| !u.is_empty()) {
            Some(username) => format!("@{username}"),
            None => "@без_username".to_string(),
        }
    }
}
