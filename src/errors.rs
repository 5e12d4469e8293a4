//! Error types for the report pipeline
//!
//! Parsing never fails on bad input; these errors only surface from the outer
//! layers (configuration, exports) and from typed prefix conversion.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReportError {
    /// A bandwidth prefix outside of K/M/G
    #[error("Unknown bandwidth prefix '{0}'")]
    UnknownPrefix(char),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Log name template '{template}' is missing the {placeholder} placeholder")]
    InvalidTemplate {
        template: String,
        placeholder: &'static str,
    },

    #[error("Unsupported output format '{0}' (expected table, json or csv)")]
    UnsupportedFormat(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Join error: {0}")]
    Join(#[from] tokio::task::JoinError),
}

pub type ReportResult<T> = std::result::Result<T, ReportError>;
