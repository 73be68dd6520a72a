//! Per-command request handling.
//!
//! Stateless dispatch: every inbound command maps to one method that talks
//! to the stores and answers through the [`Messenger`] port. Each action is
//! also written to the audit channel, best effort.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::aggregator::RateAggregator;
use super::audit::AuditLog;
use super::registry::SubscriptionRegistry;
use super::render::{escape_html, render_digest, render_summary, SummaryStyle, UNAVAILABLE_TEXT};
use super::usage::UsageStore;
use crate::domain::id::{ChatId, MessageRef, Requester};
use crate::domain::subscription::NotifyInterval;
use crate::port::outbound::clock::Clock;
use crate::port::outbound::messenger::{
    DeliveryError, Markup, Messenger, OutgoingMessage, TextFormat,
};

const GREETING_TEXT: &str = "👋 Привет!\n\nВыбери нужный раздел ниже 👇";
const LOADING_TEXT: &str = "⏳ Загрузка курса, ожидайте...";
const LOADING_FRAMES: [&str; 3] = [".", "..", "..."];
const MENU_REFRESHED_TEXT: &str = "🔄 Меню обновлено:";
const SETTINGS_TEXT: &str = "Выбери частоту автообновления курса:";

/// Inbound command, already decoded from platform text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    ShowRate,
    Settings,
    Profile,
    DisableNotifications,
    /// Anything else; answered by re-issuing the menu.
    Other,
}

/// Selection made in the interval picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntervalChoice {
    Subscribe(NotifyInterval),
    Off,
}

/// Collaborators of the [`RequestHandler`].
pub struct HandlerDeps {
    pub aggregator: Arc<RateAggregator>,
    pub registry: Arc<SubscriptionRegistry>,
    pub usage: Arc<UsageStore>,
    pub messenger: Arc<dyn Messenger>,
    pub audit: AuditLog,
    pub clock: Arc<dyn Clock>,
    pub style: Arc<SummaryStyle>,
}

pub struct RequestHandler {
    aggregator: Arc<RateAggregator>,
    registry: Arc<SubscriptionRegistry>,
    usage: Arc<UsageStore>,
    messenger: Arc<dyn Messenger>,
    audit: AuditLog,
    clock: Arc<dyn Clock>,
    style: Arc<SummaryStyle>,
    /// Loading animation frame period; zero disables the animation.
    animation: Duration,
}

impl RequestHandler {
    #[must_use]
    pub fn new(deps: HandlerDeps, animation: Duration) -> Self {
        Self {
            aggregator: deps.aggregator,
            registry: deps.registry,
            usage: deps.usage,
            messenger: deps.messenger,
            audit: deps.audit,
            clock: deps.clock,
            style: deps.style,
            animation,
        }
    }

    /// Dispatch one text command.
    ///
    /// # Errors
    ///
    /// Returns the first failed reply to the requester. Audit failures never
    /// surface here.
    pub async fn handle_command(
        &self,
        requester: &Requester,
        command: Command,
    ) -> Result<(), DeliveryError> {
        debug!(user_id = requester.user.0, ?command, "Handling command");
        match command {
            Command::Start => self.start(requester).await,
            Command::ShowRate => self.show_rate(requester).await,
            Command::Settings => self.open_settings(requester).await,
            Command::Profile => self.profile(requester).await,
            Command::DisableNotifications => self.disable(requester).await,
            Command::Other => self.refresh_menu(requester).await,
        }
    }

    async fn start(&self, requester: &Requester) -> Result<(), DeliveryError> {
        self.messenger
            .send(
                requester.chat,
                OutgoingMessage::plain(GREETING_TEXT).with_markup(Markup::MainMenu),
            )
            .await?;
        self.audit_action(requester, "нажал /start").await;
        Ok(())
    }

    async fn show_rate(&self, requester: &Requester) -> Result<(), DeliveryError> {
        let chat = requester.chat;
        self.audit_action(requester, "нажал «Показать курс»").await;

        let placeholder = self
            .messenger
            .send(chat, OutgoingMessage::plain(LOADING_TEXT))
            .await?;
        let animation = self.spawn_animation(chat, placeholder);

        let result = self.aggregator.aggregate().await;

        if let Some(handle) = animation {
            handle.abort();
            let _ = handle.await;
        }

        let board = match result {
            Ok(board) => board,
            Err(err) => {
                warn!(user_id = requester.user.0, error = %err, "Rate request failed");
                return self
                    .messenger
                    .edit(
                        chat,
                        placeholder,
                        UNAVAILABLE_TEXT.to_string(),
                        TextFormat::Plain,
                    )
                    .await;
            }
        };

        self.messenger
            .edit(
                chat,
                placeholder,
                render_summary(&board, &self.style),
                TextFormat::Html,
            )
            .await?;

        let now = self.clock.now();
        self.usage.record(requester.user, now);
        self.audit
            .record(format!(
                "📊 Курс {} ({})\n🕒 {} {}\n{}",
                requester.audit_handle(),
                requester.user,
                now.format("%H:%M:%S"),
                self.audit.zone_label(),
                render_digest(&board)
            ))
            .await;
        Ok(())
    }

    /// Cycle the placeholder text until aborted. Stops on the first failed edit.
    fn spawn_animation(&self, chat: ChatId, message: MessageRef) -> Option<JoinHandle<()>> {
        if self.animation.is_zero() {
            return None;
        }

        let messenger = Arc::clone(&self.messenger);
        let period = self.animation;
        Some(tokio::spawn(async move {
            for frame in LOADING_FRAMES.iter().cycle() {
                tokio::time::sleep(period).await;
                let text = format!("⏳ Загрузка курса{frame}");
                if messenger
                    .edit(chat, message, text, TextFormat::Plain)
                    .await
                    .is_err()
                {
                    break;
                }
            }
        }))
    }

    async fn open_settings(&self, requester: &Requester) -> Result<(), DeliveryError> {
        let current = self.registry.get(requester.chat);
        let text = match current {
            Some(sub) => format!("{SETTINGS_TEXT}\nСейчас: {}.", sub.interval.label()),
            None => SETTINGS_TEXT.to_string(),
        };

        self.messenger
            .send(
                requester.chat,
                OutgoingMessage::plain(text).with_markup(Markup::IntervalPicker {
                    subscribed: current.is_some(),
                }),
            )
            .await?;
        self.audit_action(requester, "открыл настройки автообновления")
            .await;
        Ok(())
    }

    /// Apply a choice from the interval picker.
    ///
    /// # Errors
    ///
    /// Returns the first failed reply; the registry change is kept regardless.
    pub async fn handle_interval_choice(
        &self,
        requester: &Requester,
        callback_id: &str,
        choice: IntervalChoice,
    ) -> Result<(), DeliveryError> {
        let chat = requester.chat;
        match choice {
            IntervalChoice::Off => {
                self.registry.unsubscribe(chat);
                self.answer(callback_id, "Автообновление выключено").await;
                self.messenger
                    .send(chat, OutgoingMessage::plain("🔕 Автообновление выключено."))
                    .await?;
                self.audit_action(requester, "выключил автообновление").await;
            }
            IntervalChoice::Subscribe(interval) => {
                let subscription = self.registry.subscribe(chat, interval, self.clock.now());
                debug!(chat_id = chat.0, ?subscription, "Subscription saved");
                self.answer(callback_id, "Настройки сохранены").await;
                self.messenger
                    .send(
                        chat,
                        OutgoingMessage::plain(format!(
                            "🔔 Автообновление включено: {}.",
                            interval.label()
                        )),
                    )
                    .await?;
                self.audit_action(
                    requester,
                    &format!("включил автообновление ({})", interval.label()),
                )
                .await;
            }
        }
        Ok(())
    }

    async fn disable(&self, requester: &Requester) -> Result<(), DeliveryError> {
        if self.registry.unsubscribe(requester.chat).is_some() {
            self.messenger
                .send(
                    requester.chat,
                    OutgoingMessage::plain("🔕 Уведомления отключены."),
                )
                .await?;
            self.audit_action(requester, "отключил уведомления").await;
        } else {
            self.messenger
                .send(
                    requester.chat,
                    OutgoingMessage::plain("Уведомления уже выключены."),
                )
                .await?;
        }
        Ok(())
    }

    async fn profile(&self, requester: &Requester) -> Result<(), DeliveryError> {
        let stat = self.usage.get(requester.user);
        let last = stat.last_request.map_or_else(
            || "—".to_string(),
            |at| at.format("%d.%m.%Y %H:%M:%S").to_string(),
        );

        let text = format!(
            "👤 <b>Профиль</b>\n\n\
            Ник: {}\n\
            ID: <code>{}</code>\n\n\
            Запросов курса: {}\n\
            Последний запрос: {} ({})",
            escape_html(&requester.display_name()),
            requester.user,
            stat.requests,
            last,
            escape_html(self.audit.zone_label()),
        );

        self.messenger
            .send(requester.chat, OutgoingMessage::html(text))
            .await?;
        self.audit_action(requester, "открыл профиль").await;
        Ok(())
    }

    async fn refresh_menu(&self, requester: &Requester) -> Result<(), DeliveryError> {
        self.messenger
            .send(
                requester.chat,
                OutgoingMessage::plain(MENU_REFRESHED_TEXT).with_markup(Markup::MainMenu),
            )
            .await?;
        Ok(())
    }

    async fn answer(&self, callback_id: &str, text: &str) {
        if let Err(err) = self.messenger.answer_callback(callback_id, text).await {
            debug!(error = %err, "Callback acknowledgement failed");
        }
    }

    async fn audit_action(&self, requester: &Requester, action: &str) {
        self.audit
            .user_action(requester, action, self.clock.now())
            .await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::id::UserId;
    use crate::domain::rate::{Quote, SourceId};
    use crate::domain::schedule::QuietHours;
    use crate::port::outbound::source::RateSource;
    use crate::testkit::clock::{msk, ManualClock};
    use crate::testkit::messenger::{Call, RecordingMessenger};
    use crate::testkit::source::ScriptedSource;
    use rust_decimal_macros::dec;
    use tokio_test::{assert_err, assert_ok};

    const AUDIT: ChatId = ChatId(-900);

    struct Fixture {
        handler: RequestHandler,
        messenger: Arc<RecordingMessenger>,
        registry: Arc<SubscriptionRegistry>,
        usage: Arc<UsageStore>,
        clock: Arc<ManualClock>,
        source: Arc<ScriptedSource>,
    }

    fn fixture_with(source: ScriptedSource, animation: Duration) -> Fixture {
        let clock = Arc::new(ManualClock::new(msk(2024, 5, 10, 10, 0)));
        let messenger = Arc::new(RecordingMessenger::new());
        let registry = Arc::new(SubscriptionRegistry::new(QuietHours::default()));
        let usage = Arc::new(UsageStore::new());
        let source = Arc::new(source);
        let aggregator = Arc::new(RateAggregator::new(
            vec![source.clone() as Arc<dyn RateSource>],
            Duration::from_secs(2),
            clock.clone(),
        ));

        let handler = RequestHandler::new(
            HandlerDeps {
                aggregator,
                registry: registry.clone(),
                usage: usage.clone(),
                messenger: messenger.clone(),
                audit: AuditLog::new(Some(AUDIT), messenger.clone(), "МСК"),
                clock: clock.clone(),
                style: Arc::new(SummaryStyle::default()),
            },
            animation,
        );

        Fixture {
            handler,
            messenger,
            registry,
            usage,
            clock,
            source,
        }
    }

    fn fixture() -> Fixture {
        fixture_with(
            ScriptedSource::new(SourceId::Upbit, Some(Quote::Price(dec!(1460)))),
            Duration::ZERO,
        )
    }

    fn requester() -> Requester {
        Requester {
            user: UserId(77),
            chat: ChatId(77),
            username: None,
            first_name: "Min".to_string(),
            last_name: Some("<Kim>".to_string()),
        }
    }

    #[tokio::test]
    async fn start_sends_menu() {
        let f = fixture();
        f.handler
            .handle_command(&requester(), Command::Start)
            .await
            .unwrap();

        let sent = f.messenger.sent_to(ChatId(77));
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].markup, Some(Markup::MainMenu));
        assert_eq!(f.messenger.sent_to(AUDIT).len(), 1);
    }

    #[tokio::test]
    async fn show_rate_replaces_placeholder_and_counts() {
        let f = fixture();
        f.handler
            .handle_command(&requester(), Command::ShowRate)
            .await
            .unwrap();

        let sent = f.messenger.sent_to(ChatId(77));
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].text, LOADING_TEXT);

        let edits = f.messenger.edits_in(ChatId(77));
        let (text, format) = edits.last().unwrap();
        assert_eq!(*format, TextFormat::Html);
        assert!(text.contains("UPBIT:   <b>1 460 ₩</b>"));

        let stat = f.usage.get(UserId(77));
        assert_eq!(stat.requests, 1);
        assert_eq!(stat.last_request, Some(msk(2024, 5, 10, 10, 0)));

        let audit = f.messenger.sent_to(AUDIT);
        assert!(audit.last().unwrap().text.contains("Upbit: 1 460 | Bithumb: —"));
    }

    #[tokio::test]
    async fn show_rate_failure_shows_retry_message() {
        let f = fixture_with(ScriptedSource::new(SourceId::Upbit, None), Duration::ZERO);
        f.handler
            .handle_command(&requester(), Command::ShowRate)
            .await
            .unwrap();

        let edits = f.messenger.edits_in(ChatId(77));
        assert_eq!(
            edits,
            vec![(UNAVAILABLE_TEXT.to_string(), TextFormat::Plain)]
        );
        assert_eq!(f.usage.get(UserId(77)).requests, 0);
    }

    #[tokio::test]
    async fn loading_animation_runs_while_fetching() {
        let f = fixture_with(
            ScriptedSource::new(SourceId::Upbit, Some(Quote::Price(dec!(1460))))
                .with_delay(Duration::from_millis(300)),
            Duration::from_millis(40),
        );
        f.handler
            .handle_command(&requester(), Command::ShowRate)
            .await
            .unwrap();

        let edits = f.messenger.edits_in(ChatId(77));
        assert!(edits.len() >= 2);
        assert!(edits[0].0.starts_with("⏳ Загрузка курса"));
        let (last, format) = edits.last().unwrap();
        assert_eq!(*format, TextFormat::Html);
        assert!(last.contains("АКТУАЛЬНЫЕ КУРСЫ"));
        assert_eq!(f.source.calls(), 1);
    }

    #[tokio::test]
    async fn settings_show_current_interval_and_off_button() {
        let f = fixture();
        f.handler
            .handle_command(&requester(), Command::Settings)
            .await
            .unwrap();
        f.registry
            .subscribe(ChatId(77), NotifyInterval::FiveHours, f.clock.now());
        f.handler
            .handle_command(&requester(), Command::Settings)
            .await
            .unwrap();

        let sent = f.messenger.sent_to(ChatId(77));
        assert_eq!(sent[0].text, SETTINGS_TEXT);
        assert_eq!(
            sent[0].markup,
            Some(Markup::IntervalPicker { subscribed: false })
        );
        assert!(sent[1].text.ends_with("Сейчас: каждые 5 часов."));
        assert_eq!(
            sent[1].markup,
            Some(Markup::IntervalPicker { subscribed: true })
        );
    }

    #[tokio::test]
    async fn choosing_interval_subscribes_and_acknowledges() {
        let f = fixture();
        f.handler
            .handle_interval_choice(
                &requester(),
                "cb-1",
                IntervalChoice::Subscribe(NotifyInterval::Hourly),
            )
            .await
            .unwrap();

        let sub = f.registry.get(ChatId(77)).unwrap();
        assert_eq!(sub.interval, NotifyInterval::Hourly);
        assert_eq!(sub.last_delivery, Some(msk(2024, 5, 10, 10, 0)));
        assert_eq!(
            f.messenger.answers(),
            vec![("cb-1".to_string(), "Настройки сохранены".to_string())]
        );
        assert_eq!(
            f.messenger.sent_to(ChatId(77))[0].text,
            "🔔 Автообновление включено: каждый 1 час."
        );
    }

    #[tokio::test]
    async fn daily_choice_aligns_to_morning() {
        let f = fixture();
        f.clock.set(msk(2024, 5, 10, 23, 30));
        f.handler
            .handle_interval_choice(
                &requester(),
                "cb-2",
                IntervalChoice::Subscribe(NotifyInterval::Daily),
            )
            .await
            .unwrap();

        let sub = f.registry.get(ChatId(77)).unwrap();
        assert!(!sub.is_due(msk(2024, 5, 11, 7, 59)));
        assert!(sub.is_due(msk(2024, 5, 11, 8, 0)));
    }

    #[tokio::test]
    async fn off_choice_unsubscribes() {
        let f = fixture();
        f.registry
            .subscribe(ChatId(77), NotifyInterval::Hourly, f.clock.now());
        f.handler
            .handle_interval_choice(&requester(), "cb-3", IntervalChoice::Off)
            .await
            .unwrap();

        assert!(f.registry.get(ChatId(77)).is_none());
        assert_eq!(f.messenger.answers()[0].1, "Автообновление выключено");
    }

    #[tokio::test]
    async fn disable_twice_reports_already_disabled() {
        let f = fixture();
        f.registry
            .subscribe(ChatId(77), NotifyInterval::Hourly, f.clock.now());

        f.handler
            .handle_command(&requester(), Command::DisableNotifications)
            .await
            .unwrap();
        f.handler
            .handle_command(&requester(), Command::DisableNotifications)
            .await
            .unwrap();

        let texts: Vec<_> = f
            .messenger
            .sent_to(ChatId(77))
            .into_iter()
            .map(|m| m.text)
            .collect();
        assert_eq!(
            texts,
            vec!["🔕 Уведомления отключены.", "Уведомления уже выключены."]
        );
        assert!(f.registry.is_empty());
    }

    #[tokio::test]
    async fn profile_shows_escaped_name_and_counters() {
        let f = fixture();
        f.usage.record(UserId(77), msk(2024, 5, 9, 18, 45));
        f.handler
            .handle_command(&requester(), Command::Profile)
            .await
            .unwrap();

        let sent = f.messenger.sent_to(ChatId(77));
        assert_eq!(sent[0].format, TextFormat::Html);
        assert!(sent[0].text.contains("Ник: Min &lt;Kim&gt;"));
        assert!(sent[0].text.contains("ID: <code>77</code>"));
        assert!(sent[0].text.contains("Запросов курса: 1"));
        assert!(sent[0].text.contains("Последний запрос: 09.05.2024 18:45:00 (МСК)"));
    }

    #[tokio::test]
    async fn profile_without_requests_shows_dash() {
        let f = fixture();
        f.handler
            .handle_command(&requester(), Command::Profile)
            .await
            .unwrap();
        assert!(f.messenger.sent_to(ChatId(77))[0]
            .text
            .contains("Последний запрос: — (МСК)"));
    }

    #[tokio::test]
    async fn other_text_reissues_menu_without_audit() {
        let f = fixture();
        f.handler
            .handle_command(&requester(), Command::Other)
            .await
            .unwrap();

        assert_eq!(
            f.messenger.calls(),
            vec![Call::Sent {
                chat: ChatId(77),
                message: OutgoingMessage::plain(MENU_REFRESHED_TEXT).with_markup(Markup::MainMenu),
            }]
        );
    }

    #[tokio::test]
    async fn reply_failure_surfaces_but_audit_failure_does_not() {
        let f = fixture();
        f.messenger.fail_chat(AUDIT, "Bad Request: chat not found");
        assert_ok!(f.handler.handle_command(&requester(), Command::Start).await);

        f.messenger
            .fail_chat(ChatId(77), "Forbidden: bot was blocked by the user");
        let err = assert_err!(f.handler.handle_command(&requester(), Command::Start).await);
        assert!(err.is_recipient_gone());
    }
}
