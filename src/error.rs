use thiserror::Error;

use crate::domain::rate::SourceId;

/// Configuration-related errors with structured variants.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    #[error("{feed} response rejected: {reason}")]
    Upstream { feed: SourceId, reason: String },

    #[error("parse error: {0}")]
    Parse(String),
}

impl Error {
    /// Build an [`Error::Upstream`] for a response that arrived but was unusable.
    pub fn upstream(feed: SourceId, reason: impl Into<String>) -> Self {
        Self::Upstream {
            feed,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
