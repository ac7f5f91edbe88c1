//! Provider call errors.
//!
//! These never leave a backend: `CallGuard` turns them into the inline
//! failure text returned from `generate`. They exist so providers can use
//! `?` internally and so observers see a typed description.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendError {
    /// The provider needs a key and none was configured.
    #[error("missing API key for provider '{provider}'")]
    MissingApiKey { provider: String },

    /// Transport-level failure (connect, timeout, body read).
    #[error("request failed: {0}")]
    Request(String),

    /// The provider answered with a non-success status.
    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },

    /// The provider answered but the body was not what we expected.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// No async runtime could be created for the blocking bridge.
    #[error("failed to create async runtime: {0}")]
    Runtime(String),

    /// The provider implementation panicked.
    #[error("backend panicked: {0}")]
    Panicked(String),
}

impl BackendError {
    /// Check if a manual retry by the caller could plausibly succeed.
    ///
    /// Nothing in the engine retries on its own.
    pub fn is_retryable(&self) -> bool {
        match self {
            BackendError::Request(_) => true,
            BackendError::Status { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }

    /// Get the error code suitable for logging or reporting.
    pub fn error_code(&self) -> &'static str {
        match self {
            BackendError::MissingApiKey { .. } => "MISSING_API_KEY",
            BackendError::Request(_) => "REQUEST_FAILED",
            BackendError::Status { .. } => "HTTP_STATUS",
            BackendError::InvalidResponse(_) => "INVALID_RESPONSE",
            BackendError::Runtime(_) => "RUNTIME_ERROR",
            BackendError::Panicked(_) => "BACKEND_PANICKED",
        }
    }
}

pub type BackendResult<T> = Result<T, BackendError>;
