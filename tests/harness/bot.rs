use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, FixedOffset};
use ratebot::application::aggregator::RateAggregator;
use ratebot::application::audit::AuditLog;
use ratebot::application::handler::{HandlerDeps, RequestHandler};
use ratebot::application::registry::SubscriptionRegistry;
use ratebot::application::render::SummaryStyle;
use ratebot::application::scheduler::Scheduler;
use ratebot::application::usage::UsageStore;
use ratebot::domain::id::{ChatId, Requester, UserId};
use ratebot::domain::rate::{Quote, SourceId};
use ratebot::domain::schedule::QuietHours;
use ratebot::port::RateSource;
use ratebot::testkit::clock::ManualClock;
use ratebot::testkit::messenger::RecordingMessenger;
use ratebot::testkit::source::ScriptedSource;
use rust_decimal_macros::dec;

pub const AUDIT_CHAT: ChatId = ChatId(-1_000_777);

/// Handler and scheduler wired to in-memory fakes, sharing one set of stores.
pub struct TestBot {
    pub handler: RequestHandler,
    pub scheduler: Scheduler,
    pub messenger: Arc<RecordingMessenger>,
    pub registry: Arc<SubscriptionRegistry>,
    pub usage: Arc<UsageStore>,
    pub clock: Arc<ManualClock>,
    pub upbit: Arc<ScriptedSource>,
    pub bithumb: Arc<ScriptedSource>,
    pub krw_rub: Arc<ScriptedSource>,
    pub abcex: Arc<ScriptedSource>,
}

impl TestBot {
    pub fn start_at(now: DateTime<FixedOffset>) -> Self {
        let clock = Arc::new(ManualClock::new(now));
        let messenger = Arc::new(RecordingMessenger::new());
        let quiet = QuietHours::default();
        let registry = Arc::new(SubscriptionRegistry::new(quiet));
        let usage = Arc::new(UsageStore::new());
        let style = Arc::new(SummaryStyle::default());

        let upbit = Arc::new(ScriptedSource::new(
            SourceId::Upbit,
            Some(Quote::Price(dec!(1460.4))),
        ));
        let bithumb = Arc::new(ScriptedSource::new(
            SourceId::Bithumb,
            Some(Quote::Price(dec!(1455))),
        ));
        let krw_rub = Arc::new(ScriptedSource::new(
            SourceId::KrwRub,
            Some(Quote::Price(dec!(6622.517))),
        ));
        let abcex = Arc::new(ScriptedSource::new(
            SourceId::Abcex,
            Some(Quote::BidAsk {
                bid: dec!(91.2),
                ask: dec!(92.15),
            }),
        ));
        let sources: Vec<Arc<dyn RateSource>> = vec![
            upbit.clone(),
            bithumb.clone(),
            krw_rub.clone(),
            abcex.clone(),
        ];

        let aggregator = Arc::new(RateAggregator::new(
            sources,
            Duration::from_secs(2),
            clock.clone(),
        ));
        let audit = AuditLog::new(Some(AUDIT_CHAT), messenger.clone(), "МСК");

        let scheduler = Scheduler::new(
            registry.clone(),
            aggregator.clone(),
            messenger.clone(),
            audit.clone(),
            clock.clone(),
            quiet,
            style.clone(),
            Duration::from_secs(60),
        );
        let handler = RequestHandler::new(
            HandlerDeps {
                aggregator,
                registry: registry.clone(),
                usage: usage.clone(),
                messenger: messenger.clone(),
                audit,
                clock: clock.clone(),
                style,
            },
            Duration::ZERO,
        );

        Self {
            handler,
            scheduler,
            messenger,
            registry,
            usage,
            clock,
            upbit,
            bithumb,
            krw_rub,
            abcex,
        }
    }

    /// Total upstream fetches across all four sources.
    pub fn fetches(&self) -> usize {
        self.upbit.calls() + self.bithumb.calls() + self.krw_rub.calls() + self.abcex.calls()
    }
}

pub fn user(id: u64, username: Option<&str>) -> Requester {
    Requester {
        user: UserId(id),
        chat: ChatId(i64::try_from(id).unwrap_or_default()),
        username: username.map(str::to_string),
        first_name: format!("User{id}"),
        last_name: None,
    }
}
