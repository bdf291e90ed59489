//! Shared configuration for the marketplace review extractor.
//!
//! Holds the run configuration read from `MKREVIEWS_*` environment variables
//! and the locale tables (month names, relative-date keywords, vote labels)
//! that the field normalizer consumes.

pub mod app_config;
pub mod config;
pub mod locale;

pub use app_config::RunConfig;
pub use config::{load_run_config, load_run_config_from_env};
pub use locale::{load_locale, parse_locale, Locale};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read locale file {path}: {source}")]
    LocaleFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse locale file: {0}")]
    LocaleFileParse(#[from] serde_yaml::Error),

    #[error("locale validation failed: {0}")]
    Validation(String),
}
