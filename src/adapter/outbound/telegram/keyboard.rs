//! Reply and inline keyboards.

use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup, KeyboardButton, KeyboardMarkup};

use crate::domain::subscription::NotifyInterval;
use crate::port::outbound::messenger::Markup;

pub const BTN_SHOW_RATE: &str = "📊 Показать курс";
pub const BTN_AUTO_UPDATE: &str = "🔔 Автообновление";
pub const BTN_PROFILE: &str = "👤 Профиль";
pub const BTN_DISABLE: &str = "🚫 Отключить уведомления";

/// Prefix shared by every interval picker callback.
pub const CALLBACK_PREFIX: &str = "auto_";
pub const CALLBACK_OFF: &str = "auto_off";

/// Persistent main menu, two buttons per row.
#[must_use]
pub fn main_menu() -> KeyboardMarkup {
    KeyboardMarkup::new(vec![
        vec![
            KeyboardButton::new(BTN_SHOW_RATE),
            KeyboardButton::new(BTN_AUTO_UPDATE),
        ],
        vec![KeyboardButton::new(BTN_PROFILE), KeyboardButton::new(BTN_DISABLE)],
    ])
    .resize_keyboard()
}

/// Callback data for an interval button.
#[must_use]
pub fn interval_callback(interval: NotifyInterval) -> String {
    format!("{CALLBACK_PREFIX}{}", interval.code())
}

/// Inline interval picker. The off row is shown only to subscribed chats.
#[must_use]
pub fn interval_picker(subscribed: bool) -> InlineKeyboardMarkup {
    let mut rows = vec![
        vec![
            InlineKeyboardButton::callback(
                "🕐 Каждый 1 час",
                interval_callback(NotifyInterval::Hourly),
            ),
            InlineKeyboardButton::callback(
                "🕔 Каждые 5 часов",
                interval_callback(NotifyInterval::FiveHours),
            ),
        ],
        vec![InlineKeyboardButton::callback(
            "🕛 Раз в 24 часа (с 08:00 МСК)",
            interval_callback(NotifyInterval::Daily),
        )],
    ];

    if subscribed {
        rows.push(vec![InlineKeyboardButton::callback(
            "🔕 Выключить автообновление",
            CALLBACK_OFF,
        )]);
    }

    InlineKeyboardMarkup::new(rows)
}

/// Platform keyboard for an abstract [`Markup`].
#[must_use]
pub fn reply_markup(markup: Markup) -> teloxide::types::ReplyMarkup {
    match markup {
        Markup::MainMenu => main_menu().into(),
        Markup::IntervalPicker { subscribed } => interval_picker(subscribed).into(),
    }
}
