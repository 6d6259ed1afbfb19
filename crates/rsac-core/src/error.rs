//! Error types for the RSAC reporting backend

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReportError {
    // Client input errors; surfaced as 4xx before any query runs
    #[error("Unknown dataset key: {0}")]
    UnknownDataset(String),

    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),

    #[error("Unsupported export format: {0}")]
    UnknownFormat(String),

    // Configuration errors
    #[error("Invalid configuration value for {key}: {reason}")]
    ConfigInvalid { key: String, reason: String },

    // Downstream failures
    #[error("Database error: {0}")]
    Database(String),

    #[error("Export rendering failed: {0}")]
    Export(String),
}

impl ReportError {
    /// True for errors caused by the request itself rather than the backend.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            ReportError::UnknownDataset(_)
                | ReportError::MissingParameter(_)
                | ReportError::UnknownFormat(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, ReportError>;
