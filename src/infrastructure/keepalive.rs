//! Periodic self-ping that keeps free-tier hosts from idling the service.

use std::time::Duration;

use reqwest::Client as HttpClient;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, warn};

const PING_TIMEOUT: Duration = Duration::from_secs(10);

/// GET `url` once. Returns the HTTP status on any response.
///
/// # Errors
///
/// Returns the transport error when no response arrived.
pub async fn ping(http: &HttpClient, url: &str) -> reqwest::Result<reqwest::StatusCode> {
    let response = http.get(url).timeout(PING_TIMEOUT).send().await?;
    Ok(response.status())
}

/// Ping `url` every `period`, forever. Failures are logged and ignored.
pub async fn run(http: HttpClient, url: String, period: Duration) {
    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;
        match ping(&http, &url).await {
            Ok(status) if status.is_success() => debug!(%status, "Keep-alive ping"),
            Ok(status) => warn!(%status, "Keep-alive ping answered with an error status"),
            Err(err) => warn!(error = %err, "Keep-alive ping failed"),
        }
    }
}
