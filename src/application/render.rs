//! Text rendering for rate summaries and audit lines.

use rust_decimal::Decimal;

use super::aggregator::RateBoard;
use crate::domain::money::format_amount;
use crate::domain::rate::SourceId;

/// Placeholder for a value no source could provide.
pub const MISSING: &str = "—";

/// Shown instead of a summary when every source failed.
pub const UNAVAILABLE_TEXT: &str = "⚠️ Не удалось получить курс.\nПопробуйте позже.";

const SEPARATOR: &str = "━━━━━━━━━━━━━━";

/// Presentation settings shared by every rendered message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryStyle {
    /// Label appended to local timestamps, e.g. `МСК`.
    pub zone_label: String,
    /// Optional closing lines (contacts, terms), raw HTML.
    pub footer: Option<String>,
}

impl Default for SummaryStyle {
    fn default() -> Self {
        Self {
            zone_label: "МСК".to_string(),
            footer: None,
        }
    }
}

fn amount(value: Option<Decimal>, dp: u32, unit: &str) -> String {
    match value {
        Some(v) => format!("{} {unit}", format_amount(v, dp)),
        None => MISSING.to_string(),
    }
}

fn bare(value: Option<Decimal>, dp: u32) -> String {
    value.map_or_else(|| MISSING.to_string(), |v| format_amount(v, dp))
}

/// Full rate summary in HTML parse mode.
#[must_use]
pub fn render_summary(board: &RateBoard, style: &SummaryStyle) -> String {
    let (ab_buy, ab_sell) = board
        .bid_ask(SourceId::Abcex)
        .map_or((None, None), |(bid, ask)| (Some(bid), Some(ask)));
    let timestamp = board.generated_at.format("%d.%m.%Y, %H:%M");

    let mut text = format!(
        "💱 <b>АКТУАЛЬНЫЕ КУРСЫ</b>\n\n\
        🇰🇷 <b>USDT → KRW</b>\n\
        ◾ UPBIT:   <b>{upbit}</b>\n\
        ◾ BITHUMB: <b>{bithumb}</b>\n\
        {SEPARATOR}\n\n\
        🇷🇺 <b>USDT → RUB (ABCEX)</b>\n\
        ◾ Покупка: <b>{buy}</b>\n\
        ◾ Продажа: <b>{sell}</b>\n\
        {SEPARATOR}\n\n\
        🇰🇷➡️🇷🇺 <b>KRW → RUB</b>\n\
        ◾ 1 000 000 ₩ → <b>{krw_rub}</b>\n\
        {SEPARATOR}\n\
        ⏱ Обновлено: <b>{timestamp} ({zone})</b>",
        upbit = amount(board.price(SourceId::Upbit), 0, "₩"),
        bithumb = amount(board.price(SourceId::Bithumb), 0, "₩"),
        buy = amount(ab_buy, 2, "₽"),
        sell = amount(ab_sell, 2, "₽"),
        krw_rub = amount(board.price(SourceId::KrwRub), 2, "₽"),
        zone = escape_html(&style.zone_label),
    );

    if let Some(footer) = style.footer.as_deref().filter(|f| !f.is_empty()) {
        text.push_str("\n\n");
        text.push_str(footer);
    }

    text
}

/// One-line digest of every value, for the audit channel.
#[must_use]
pub fn render_digest(board: &RateBoard) -> String {
    let (ab_buy, ab_sell) = board
        .bid_ask(SourceId::Abcex)
        .map_or((None, None), |(bid, ask)| (Some(bid), Some(ask)));

    format!(
        "Upbit: {} | Bithumb: {} | KRW→RUB (1M): {} ₽ | ABCEX buy/sell: {} / {} ₽",
        bare(board.price(SourceId::Upbit), 0),
        bare(board.price(SourceId::Bithumb), 0),
        bare(board.price(SourceId::KrwRub), 2),
        bare(ab_buy, 2),
        bare(ab_sell, 2),
    )
}

/// Escape text for inclusion in an HTML-mode message.
#[must_use]
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}
