use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::http::StatusCode;
use axum::routing::get;
use axum::Router;
use ratebot::adapter::outbound::source::settings::{EndpointConfig, SourcesConfig};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Local HTTP server standing in for the upstream rate APIs.
pub struct Upstream {
    base: String,
    server: JoinHandle<()>,
}

impl Upstream {
    pub async fn start(router: Router) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = tokio::spawn(async move {
            let _ = axum::serve(listener, router).await;
        });
        Self {
            base: format!("http://{addr}"),
            server,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base)
    }

    pub fn endpoint(&self, path: &str) -> EndpointConfig {
        EndpointConfig {
            url: self.url(path),
            fallback_url: None,
            timeout_ms: 1_000,
            min_age_secs: 0,
        }
    }

    /// Sources config pointing every feed at this server.
    pub fn sources(&self) -> SourcesConfig {
        SourcesConfig {
            upbit: self.endpoint("/upbit"),
            bithumb: self.endpoint("/bithumb"),
            krw_rub: EndpointConfig {
                fallback_url: Some(self.url("/er-api")),
                ..self.endpoint("/finance")
            },
            abcex: self.endpoint("/abcex"),
            aggregate_timeout_ms: 2_000,
            ..SourcesConfig::default()
        }
    }
}

impl Drop for Upstream {
    fn drop(&mut self) {
        self.server.abort();
    }
}

/// Route answering `status` and `body`, counting hits in `hits`.
pub fn canned(
    router: Router,
    path: &str,
    status: StatusCode,
    body: &'static str,
    hits: Arc<AtomicUsize>,
) -> Router {
    router.route(
        path,
        get(move || {
            let hits = Arc::clone(&hits);
            async move {
                hits.fetch_add(1, Ordering::SeqCst);
                (status, body)
            }
        }),
    )
}

pub const UPBIT_BODY: &str = r#"[{"market":"KRW-USDT","trade_price":1460.0,"timestamp":1715328000000}]"#;
pub const BITHUMB_BODY: &str =
    r#"{"status":"0000","data":{"opening_price":"1450","closing_price":"1455.5","date":"1715328000000"}}"#;
pub const FINANCE_BODY: &str = r#"<html><body><div class="rPF6Lc"><div class="YMlKec fxKbKc">15.0000</div></div></body></html>"#;
pub const ER_API_BODY: &str = r#"{"result":"success","base_code":"RUB","rates":{"RUB":1,"KRW":16,"USD":0.011}}"#;
pub const ABCEX_BODY: &str = r#"{"ask":[{"price":92.15,"qty":1200}],"bid":[{"price":"91.2","qty":"800"}]}"#;
