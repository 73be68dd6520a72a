use std::path::PathBuf;

use clap::Parser;
use ratebot::infrastructure::bootstrap::App;
use ratebot::infrastructure::config::settings::Config;
use tracing::{error, info};

/// Telegram bot relaying USDT/KRW/RUB rates.
#[derive(Parser, Debug)]
#[command(name = "ratebot", version, about)]
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
    info!("ratebot starting");

    if let Err(e) = App::run(config).await {
        error!(error = %e, "Fatal error");
        std::process::exit(1);
    }

    info!("ratebot stopped");
}
