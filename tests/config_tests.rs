use std::collections::HashMap;
use std::io::Write;

use ratebot::error::{ConfigError, Error};
use ratebot::infrastructure::config::logging::LogFormat;
use ratebot::infrastructure::config::settings::Config;

fn write_temp_config(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().expect("create temp config");
    file.write_all(contents.as_bytes()).expect("write temp config");
    file
}

fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect();
    move |key| map.get(key).cloned()
}

#[test]
fn full_config_file_loads() {
    let file = write_temp_config(
        r#"
[telegram]
audit_chat_id = -1001234567890
animation_ms = 0

[logging]
level = "ratebot=debug,info"
format = "json"

[schedule]
tick_secs = 30
quiet_start = "22:30"
quiet_end = "07:00"
utc_offset_hours = 9
zone_label = "KST"
footer = "📩 @ratebot_support"

[sources]
user_agent = "ratebot-test"
aggregate_timeout_ms = 6000

[sources.abcex]
url = "https://hub.abcex.io/api/v2/exchange/public/orderbook/depth?instrumentCode=USDTRUB"
min_age_secs = 30

[server]
port = 8081
keepalive_url = "https://ratebot.example.com/"
keepalive_interval_secs = 300
"#,
    );

    let config = Config::load_with_env(file.path(), env(&[("TELEGRAM_TOKEN", "1:x")])).unwrap();

    assert_eq!(config.telegram.audit_chat_id, Some(-1_001_234_567_890));
    assert!(config.telegram.animation().is_zero());
    assert_eq!(config.logging.format, LogFormat::Json);
    assert_eq!(config.schedule.offset().unwrap().local_minus_utc(), 9 * 3600);
    assert_eq!(config.schedule.summary_style().zone_label, "KST");
    assert_eq!(config.sources.user_agent, "ratebot-test");
    assert_eq!(config.sources.abcex.min_age_secs, 30);
    assert_eq!(config.sources.abcex.timeout_ms, 4_000);
    assert_eq!(config.sources.upbit.url, "https://api.upbit.com/v1/ticker?markets=KRW-USDT");
    assert_eq!(config.server.port, 8081);
    assert_eq!(config.server.keepalive_interval_secs, 300);
}

#[test]
fn missing_file_is_a_read_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = Config::load_with_env(dir.path().join("absent.toml"), env(&[]));
    assert!(matches!(result, Err(Error::Config(ConfigError::ReadFile(_)))));
}

#[test]
fn malformed_toml_is_a_parse_error() {
    let file = write_temp_config("[schedule\ntick_secs = 1");
    let result = Config::load_with_env(file.path(), env(&[("TELEGRAM_TOKEN", "1:x")]));
    assert!(matches!(result, Err(Error::Config(ConfigError::Parse(_)))));
}

#[test]
fn config_rejects_missing_token() {
    let file = write_temp_config("");
    match Config::load_with_env(file.path(), env(&[])) {
        Err(Error::Config(ConfigError::MissingField {
            field: "TELEGRAM_TOKEN",
        })) => {}
        Err(err) => panic!("Expected missing token error, got {err}"),
        Ok(_) => panic!("Expected missing token error"),
    }
}

#[test]
fn config_rejects_invalid_audit_chat() {
    let file = write_temp_config("");
    let result = Config::load_with_env(
        file.path(),
        env(&[("TELEGRAM_TOKEN", "1:x"), ("AUDIT_CHAT_ID", "@channel")]),
    );
    assert!(matches!(
        result,
        Err(Error::Config(ConfigError::InvalidValue {
            field: "AUDIT_CHAT_ID",
            ..
        }))
    ));
}
