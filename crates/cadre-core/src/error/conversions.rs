//! Umbrella error type and the serialized boundary payload.

use super::agent::{AgentError, CoordinatorError};
use super::backend::BackendError;
use super::memory::MemoryError;
use super::tool::ToolError;
use crate::settings::ConfigError;
use serde::{Deserialize, Serialize};
use std::any::Any;
use thiserror::Error;

/// Main error type for Cadre operations.
#[derive(Debug, Error)]
pub enum CadreError {
    #[error("Tool error: {0}")]
    Tool(#[from] ToolError),

    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),

    #[error("Memory error: {0}")]
    Memory(#[from] MemoryError),

    #[error("Agent error: {0}")]
    Agent(#[from] AgentError),

    #[error("Coordinator error: {0}")]
    Coordinator(#[from] CoordinatorError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

pub type CadreResult<T> = Result<T, CadreError>;

/// Error as data: `{"error": "...", "kind": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorPayload {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

impl ErrorPayload {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            kind: None,
        }
    }
}

impl From<&ToolError> for ErrorPayload {
    fn from(err: &ToolError) -> Self {
        Self {
            error: err.to_string(),
            kind: Some(err.kind().to_string()),
        }
    }
}

impl From<&CoordinatorError> for ErrorPayload {
    fn from(err: &CoordinatorError) -> Self {
        Self::new(err.to_string())
    }
}

/// Extract a readable message from a caught panic payload.
pub fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_error_payload_carries_kind() {
        let payload = ErrorPayload::from(&ToolError::not_found("weather"));
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["kind"], "ToolNotFound");
        assert!(json["error"].as_str().unwrap().contains("weather"));
    }

    #[test]
    fn test_coordinator_payload_has_no_kind() {
        let payload = ErrorPayload::from(&CoordinatorError::AgentNotFound("a1".to_string()));
        let json = serde_json::to_string(&payload).unwrap();
        assert_eq!(json, r#"{"error":"Agent a1 not found"}"#);
    }

    #[test]
    fn test_panic_message_variants() {
        let static_payload: Box<dyn Any + Send> = Box::new("boom");
        assert_eq!(panic_message(static_payload), "boom");

        let owned_payload: Box<dyn Any + Send> = Box::new(String::from("owned boom"));
        assert_eq!(panic_message(owned_payload), "owned boom");

        let other_payload: Box<dyn Any + Send> = Box::new(42_u8);
        assert_eq!(panic_message(other_payload), "unknown panic");
    }
}
