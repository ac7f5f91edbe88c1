//! Agent pipeline and coordinator errors.

use super::memory::MemoryError;
use thiserror::Error;

/// Faults inside an agent's message pipeline.
///
/// `process_message` never returns these; they are rendered into the
/// apology text of the response envelope.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AgentError {
    /// A step of the pipeline panicked.
    #[error("internal fault: {0}")]
    Panicked(String),

    /// The context store rejected an operation.
    #[error("memory error: {0}")]
    Memory(#[from] MemoryError),
}

impl AgentError {
    /// Get the error code suitable for logging or reporting.
    pub fn error_code(&self) -> &'static str {
        match self {
            AgentError::Panicked(_) => "AGENT_PANICKED",
            AgentError::Memory(_) => "AGENT_MEMORY_ERROR",
        }
    }
}

pub type AgentResult<T> = Result<T, AgentError>;

/// Lookup failures at the coordinator boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoordinatorError {
    /// No agent is registered under the id.
    #[error("Agent {0} not found")]
    AgentNotFound(String),

    /// The agent exists but has never seen the session.
    #[error("Session {session_id} not found for agent {agent_id}")]
    SessionUnknown { agent_id: String, session_id: String },
}

impl CoordinatorError {
    /// Get the error code suitable for logging or reporting.
    pub fn error_code(&self) -> &'static str {
        match self {
            CoordinatorError::AgentNotFound(_) => "AGENT_NOT_FOUND",
            CoordinatorError::SessionUnknown { .. } => "SESSION_UNKNOWN",
        }
    }
}

pub type CoordinatorResult<T> = Result<T, CoordinatorError>;
