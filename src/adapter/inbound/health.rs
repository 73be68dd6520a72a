//! Liveness endpoint for the hosting platform.

use std::net::SocketAddr;

use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;
use tracing::info;

pub const LIVENESS_TEXT: &str = "Bot is running OK";

async fn liveness() -> &'static str {
    LIVENESS_TEXT
}

#[must_use]
pub fn router() -> Router {
    Router::new().route("/", get(liveness))
}

/// Serve the liveness route on an already bound listener.
///
/// # Errors
///
/// Returns the server's IO error once it stops accepting connections.
pub async fn serve(listener: TcpListener) -> std::io::Result<()> {
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, "Health endpoint listening");
    }
    axum::serve(listener, router()).await
}

/// Bind `0.0.0.0:port` and serve until failure.
///
/// # Errors
///
/// Returns the bind or server IO error.
pub async fn listen(port: u16) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr).await?;
    serve(listener).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn root_reports_running() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = tokio::spawn(serve(listener));

        let response = reqwest::get(format!("http://{addr}/")).await.unwrap();
        assert_eq!(response.status(), reqwest::StatusCode::OK);
        assert_eq!(response.text().await.unwrap(), LIVENESS_TEXT);

        server.abort();
    }
}
