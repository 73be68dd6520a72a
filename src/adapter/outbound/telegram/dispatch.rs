//! Long-polling update loop.

use std::sync::Arc;
use std::time::Duration;

use futures_util::future::{BoxFuture, FutureExt};
use teloxide::dispatching::{Dispatcher, UpdateFilterExt};
use teloxide::error_handlers::ErrorHandler;
use teloxide::types::{CallbackQuery, Message, Update, User};
use teloxide::update_listeners::polling_default;
use teloxide::{dptree, respond, Bot, RequestError};
use tracing::{debug, info, warn};

use super::command::{parse_command, parse_interval_choice};
use crate::application::handler::RequestHandler;
use crate::domain::id::{ChatId, Requester, UserId};

/// Pause after another bot instance took over `getUpdates`.
const CONFLICT_BACKOFF: Duration = Duration::from_secs(10);
/// Pause after any other polling failure.
const POLLING_BACKOFF: Duration = Duration::from_secs(15);

fn requester(user: &User, chat: ChatId) -> Requester {
    Requester {
        user: UserId(user.id.0),
        chat,
        username: user.username.clone(),
        first_name: user.first_name.clone(),
        last_name: user.last_name.clone(),
    }
}

async fn on_message(msg: Message, handler: Arc<RequestHandler>) -> Result<(), RequestError> {
    let (Some(user), Some(text)) = (msg.from.as_ref(), msg.text()) else {
        return respond(());
    };

    let who = requester(user, ChatId(msg.chat.id.0));
    let command = parse_command(text);
    if let Err(err) = handler.handle_command(&who, command).await {
        warn!(chat_id = who.chat.0, ?command, error = %err, "Failed to answer command");
    }
    respond(())
}

async fn on_callback(q: CallbackQuery, handler: Arc<RequestHandler>) -> Result<(), RequestError> {
    let Some(choice) = q.data.as_deref().and_then(parse_interval_choice) else {
        debug!(data = ?q.data, "Ignoring unrelated callback");
        return respond(());
    };

    let chat = q
        .message
        .as_ref()
        .map_or(ChatId(q.from.id.0 as i64), |m| ChatId(m.chat().id.0));
    let who = requester(&q.from, chat);
    let callback_id = q.id.to_string();

    if let Err(err) = handler
        .handle_interval_choice(&who, &callback_id, choice)
        .await
    {
        warn!(chat_id = chat.0, ?choice, error = %err, "Failed to apply interval choice");
    }
    respond(())
}

/// True when Telegram reports a second poller on the same token.
#[must_use]
pub fn is_polling_conflict(error: &str) -> bool {
    error.contains("terminated by other getUpdates request")
}

/// Backs off before the next poll after an update listener failure.
struct PollingErrorHandler;

impl ErrorHandler<RequestError> for PollingErrorHandler {
    fn handle_error(self: Arc<Self>, error: RequestError) -> BoxFuture<'static, ()> {
        async move {
            let text = error.to_string();
            let pause = if is_polling_conflict(&text) {
                warn!("Another instance is polling with this token, backing off");
                CONFLICT_BACKOFF
            } else {
                warn!(error = %text, "Polling failed");
                POLLING_BACKOFF
            };
            tokio::time::sleep(pause).await;
        }
        .boxed()
    }
}

/// Poll for updates until Ctrl-C.
pub async fn run_dispatcher(bot: Bot, handler: Arc<RequestHandler>) {
    let schema = dptree::entry()
        .branch(Update::filter_message().endpoint(on_message))
        .branch(Update::filter_callback_query().endpoint(on_callback));

    info!("Telegram dispatcher started");

    let listener = polling_default(bot.clone()).await;
    Dispatcher::builder(bot, schema)
        .dependencies(dptree::deps![handler])
        .default_handler(|_| async {})
        .enable_ctrlc_handler()
        .build()
        .dispatch_with_listener(listener, Arc::new(PollingErrorHandler))
        .await;

    info!("Telegram dispatcher stopped");
}
