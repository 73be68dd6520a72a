//! Decoding of inbound texts and callback data.

use crate::application::handler::{Command, IntervalChoice};
use crate::domain::subscription::NotifyInterval;

use super::keyboard::{BTN_AUTO_UPDATE, BTN_DISABLE, BTN_PROFILE, BTN_SHOW_RATE, CALLBACK_PREFIX};

/// Map a message text to a [`Command`].
///
/// Slash commands may carry an `@botname` suffix. Unknown input maps to
/// [`Command::Other`].
#[must_use]
pub fn parse_command(text: &str) -> Command {
    let text = text.trim();

    if let Some(rest) = text.strip_prefix('/') {
        let word = rest.split_whitespace().next().unwrap_or_default();
        let name = word.split('@').next().unwrap_or_default();
        return match name.to_lowercase().as_str() {
            "start" | "help" => Command::Start,
            _ => Command::Other,
        };
    }

    match text {
        BTN_SHOW_RATE => Command::ShowRate,
        BTN_AUTO_UPDATE => Command::Settings,
        BTN_PROFILE => Command::Profile,
        BTN_DISABLE => Command::DisableNotifications,
        _ => Command::Other,
    }
}

/// Map callback data from the interval picker.
///
/// Returns `None` for data that does not belong to the picker.
#[must_use]
pub fn parse_interval_choice(data: &str) -> Option<IntervalChoice> {
    let code = data.strip_prefix(CALLBACK_PREFIX)?;
    if code == "off" {
        return Some(IntervalChoice::Off);
    }
    NotifyInterval::from_code(code).map(IntervalChoice::Subscribe)
}
