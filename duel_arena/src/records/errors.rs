//! Match record error types.

use thiserror::Error;

/// Match record store errors
#[derive(Debug, Error)]
pub enum RecordError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Record rejected before reaching storage
    #[error("Invalid match record: {0}")]
    InvalidRecord(String),

    /// Storage backend unavailable
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

impl RecordError {
    /// Get a client-safe error message that doesn't leak storage details
    pub fn client_message(&self) -> String {
        match self {
            RecordError::Database(_) | RecordError::Unavailable(_) => {
                "Match history is temporarily unavailable".to_string()
            }
            RecordError::InvalidRecord(_) => self.to_string(),
        }
    }
}

/// Result type for match record operations
pub type RecordResult<T> = Result<T, RecordError>;
