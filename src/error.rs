//! Error types for the explorer pipeline
//!
//! Validation failures, HTTP error statuses and network failures are carried
//! as data inside results. Only the conditions below are returned as `Err`.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExplorerError {
    #[error("Malformed URL '{url}': {reason}")]
    MalformedUrl { url: String, reason: String },

    #[error("Unknown API configuration: {0}")]
    UnknownApi(String),

    #[error("Unknown endpoint '{endpoint}' in API '{api}'")]
    UnknownEndpoint { api: String, endpoint: String },

    #[error("Invalid API configuration in {source_name}: {reason}")]
    InvalidConfiguration { source_name: String, reason: String },

    #[error("Export failed: {0}")]
    Export(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ExplorerError>;
