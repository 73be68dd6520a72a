//! Composition root: builds every component from [`Config`] and runs the bot.

use std::sync::Arc;

use teloxide::Bot;
use tracing::{error, info};

use crate::adapter::inbound::health;
use crate::adapter::outbound::source::{build_sources, http_client};
use crate::adapter::outbound::telegram::{run_dispatcher, TelegramMessenger};
use crate::application::aggregator::RateAggregator;
use crate::application::audit::AuditLog;
use crate::application::handler::{HandlerDeps, RequestHandler};
use crate::application::registry::SubscriptionRegistry;
use crate::application::scheduler::Scheduler;
use crate::application::usage::UsageStore;
use crate::domain::id::ChatId;
use crate::error::Result;
use crate::infrastructure::config::settings::Config;
use crate::infrastructure::keepalive;
use crate::infrastructure::supervisor::spawn_supervised;
use crate::port::outbound::clock::{Clock, SystemClock};
use crate::port::outbound::messenger::Messenger;

/// Main application entry point.
pub struct App;

impl App {
    /// Wire everything, start background tasks and poll for updates until
    /// Ctrl-C.
    ///
    /// # Errors
    ///
    /// Returns an error only for configuration problems found while wiring.
    pub async fn run(config: Config) -> Result<()> {
        let bot = Bot::new(config.bot_token()?);
        let quiet = config.schedule.quiet_hours()?;
        let clock: Arc<dyn Clock> = Arc::new(SystemClock::new(config.schedule.offset()?));
        let style = Arc::new(config.schedule.summary_style());

        let messenger: Arc<dyn Messenger> = Arc::new(TelegramMessenger::new(bot.clone()));
        let audit = AuditLog::new(
            config.telegram.audit_chat_id.map(ChatId),
            Arc::clone(&messenger),
            style.zone_label.clone(),
        );

        let http = http_client(&config.sources);
        let aggregator = Arc::new(RateAggregator::new(
            build_sources(&config.sources, &http),
            config.sources.aggregate_timeout(),
            Arc::clone(&clock),
        ));
        let registry = Arc::new(SubscriptionRegistry::new(quiet));
        let usage = Arc::new(UsageStore::new());

        let scheduler = Arc::new(Scheduler::new(
            Arc::clone(&registry),
            Arc::clone(&aggregator),
            Arc::clone(&messenger),
            audit.clone(),
            Arc::clone(&clock),
            quiet,
            Arc::clone(&style),
            config.schedule.tick(),
        ));
        let handler = Arc::new(RequestHandler::new(
            HandlerDeps {
                aggregator,
                registry,
                usage,
                messenger,
                audit: audit.clone(),
                clock: Arc::clone(&clock),
                style,
            },
            config.telegram.animation(),
        ));

        let restart_delay = config.server.restart_delay();

        spawn_supervised("scheduler", restart_delay, move || {
            Arc::clone(&scheduler).run()
        });

        let port = config.server.port;
        spawn_supervised("health", restart_delay, move || async move {
            if let Err(err) = health::listen(port).await {
                error!(port, error = %err, "Health endpoint failed");
            }
        });

        if let Some(url) = config.server.keepalive_url.clone() {
            let period = config.server.keepalive_interval();
            spawn_supervised("keepalive", restart_delay, move || {
                keepalive::run(http.clone(), url.clone(), period)
            });
        }

        let started = clock.now();
        audit
            .record(format!(
                "🔄 Бот перезапущен\n🕒 {} {}",
                started.format("%d.%m.%Y %H:%M:%S"),
                audit.zone_label()
            ))
            .await;
        info!(
            audit = config.telegram.audit_chat_id.is_some(),
            port,
            "ratebot started"
        );

        run_dispatcher(bot, handler).await;
        Ok(())
    }
}
