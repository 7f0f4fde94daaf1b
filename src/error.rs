// src/error.rs
use thiserror::Error;

/// Result type alias for prospector operations
pub type Result<T> = std::result::Result<T, ProspectorError>;

/// Failures reported to the caller of a search, update or export
#[derive(Debug, Error)]
pub enum ProspectorError {
    #[error("Invalid index: {index}. {}", index_hint(*len))]
    InvalidIndex { index: i64, len: usize },

    #[error("Search provider unavailable: {0}")]
    ProviderUnavailable(String),

    #[error("Export sink unavailable: {0}")]
    SinkUnavailable(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

fn index_hint(len: usize) -> String {
    if len == 0 {
        "There are no results to update".to_string()
    } else {
        format!("Must be between 0 and {}", len - 1)
    }
}

impl ProspectorError {
    pub fn provider(err: impl std::fmt::Display) -> Self {
        Self::ProviderUnavailable(err.to_string())
    }

    pub fn sink(err: impl std::fmt::Display) -> Self {
        Self::SinkUnavailable(err.to_string())
    }

    /// Errors that stop the current step but not the whole run
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::Config(_))
    }
}
