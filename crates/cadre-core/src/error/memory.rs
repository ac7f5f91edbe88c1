//! Context store errors.

use thiserror::Error;

/// Errors raised by persistence hooks and snapshot handling.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MemoryError {
    /// A persistence hook failed to save or load.
    #[error("Persistence failed for '{owner}': {message}")]
    Persistence { owner: String, message: String },

    /// A snapshot could not be serialized or restored.
    #[error("Snapshot error: {0}")]
    Snapshot(String),
}

impl MemoryError {
    pub fn persistence(owner: impl Into<String>, message: impl Into<String>) -> Self {
        MemoryError::Persistence {
            owner: owner.into(),
            message: message.into(),
        }
    }

    /// Get the error code suitable for logging or reporting.
    pub fn error_code(&self) -> &'static str {
        match self {
            MemoryError::Persistence { .. } => "PERSISTENCE_FAILED",
            MemoryError::Snapshot(_) => "SNAPSHOT_ERROR",
        }
    }
}

impl From<serde_json::Error> for MemoryError {
    fn from(err: serde_json::Error) -> Self {
        MemoryError::Snapshot(err.to_string())
    }
}

pub type MemoryResult<T> = Result<T, MemoryError>;
