pub mod app_config;
pub mod config;
pub mod listings;
pub mod sources;

pub use app_config::AppConfig;
pub use config::{load_app_config, load_app_config_from_env};
pub use listings::ListingRecord;
pub use sources::{load_sources, parse_color, SelectorConfig, SourceConfig, SourcesFile};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read sources file {path}: {source}")]
    SourcesFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse sources file: {0}")]
    SourcesFileParse(#[from] serde_yaml::Error),

    #[error("sources validation failed: {0}")]
    Validation(String),
}
