use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("rate limited by {domain} (retry after {}ms)", .retry_after.as_millis())]
    RateLimited { domain: String, retry_after: Duration },

    #[error("endpoint not found: {url}")]
    NotFound { url: String },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("bot challenge page served for {url}")]
    BotChallenge { url: String },

    #[error("invalid URL \"{url}\": {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("invalid {field} selector \"{selector}\" for source {source_name}: {reason}")]
    InvalidSelector {
        source_name: String,
        field: &'static str,
        selector: String,
        reason: String,
    },

    #[error("invalid source configuration: {0}")]
    Config(#[from] dealwatch_core::ConfigError),

    #[error("seen-set I/O error at {path}: {source}")]
    SeenStoreIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("seen-set serialization error: {0}")]
    SeenStoreSerialize(#[from] serde_json::Error),
}
