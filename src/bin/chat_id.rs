//! Replies to every channel post with the channel's chat id.
//!
//! Add the bot to a channel as an admin, post anything, and use the reply
//! as `AUDIT_CHAT_ID`.

use std::path::PathBuf;

use clap::Parser;
use ratebot::infrastructure::config::settings::Config;
use teloxide::prelude::*;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "chat-id", version, about = "Reply to channel posts with the channel's chat id")]
struct Cli {
    /// Configuration file. Defaults to `$RATEBOT_CONFIG`, then `config.toml`.
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => Config::load(path),
        None => Config::load_default(),
    };
    let config = match loaded {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load config: {e}");
            std::process::exit(1);
        }
    };
    config.init_logging();

    let bot = match config.bot_token() {
        Ok(token) => Bot::new(token),
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };

    info!("Waiting for channel posts");

    let schema = Update::filter_channel_post().endpoint(|bot: Bot, msg: Message| async move {
        info!(chat_id = msg.chat.id.0, "Channel post received");
        if let Err(e) = bot
            .send_message(msg.chat.id, format!("Chat ID: {}", msg.chat.id))
            .await
        {
            warn!(error = %e, "Failed to reply with chat id");
        }
        respond(())
    });

    Dispatcher::builder(bot, schema)
        .default_handler(|_| async {})
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;
}
