//! Tool lookup and execution errors.

use thiserror::Error;

/// Errors produced at the tool registry boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ToolError {
    /// No tool is registered under the requested name.
    #[error("Tool '{tool}' not found in registry")]
    NotFound {
        /// Name that was looked up
        tool: String,
    },

    /// The executor reported a failure or panicked.
    #[error("Tool '{tool}' execution failed: {message}")]
    ExecutionFailed {
        /// Name of the tool that failed
        tool: String,
        /// Failure description from the executor
        message: String,
    },

    /// The tool was rejected at registration time.
    #[error("Invalid definition for tool '{tool}': {reason}")]
    InvalidDefinition {
        /// Name the tool reported
        tool: String,
        /// Which required field was missing or malformed
        reason: String,
    },
}

impl ToolError {
    pub fn not_found(tool: impl Into<String>) -> Self {
        ToolError::NotFound { tool: tool.into() }
    }

    pub fn execution_failed(tool: impl Into<String>, message: impl Into<String>) -> Self {
        ToolError::ExecutionFailed {
            tool: tool.into(),
            message: message.into(),
        }
    }

    pub fn invalid_definition(tool: impl Into<String>, reason: impl Into<String>) -> Self {
        ToolError::InvalidDefinition {
            tool: tool.into(),
            reason: reason.into(),
        }
    }

    /// Name of the tool this error refers to.
    pub fn tool_name(&self) -> &str {
        match self {
            ToolError::NotFound { tool }
            | ToolError::ExecutionFailed { tool, .. }
            | ToolError::InvalidDefinition { tool, .. } => tool,
        }
    }

    /// Taxonomy tag carried in serialized error payloads.
    pub fn kind(&self) -> &'static str {
        match self {
            ToolError::NotFound { .. } => "ToolNotFound",
            ToolError::ExecutionFailed { .. } => "ToolExecutionError",
            ToolError::InvalidDefinition { .. } => "InvalidToolDefinition",
        }
    }

    /// Get the error code suitable for logging or reporting.
    pub fn error_code(&self) -> &'static str {
        match self {
            ToolError::NotFound { .. } => "TOOL_NOT_FOUND",
            ToolError::ExecutionFailed { .. } => "TOOL_EXECUTION_ERROR",
            ToolError::InvalidDefinition { .. } => "INVALID_TOOL_DEFINITION",
        }
    }
}

/// Result type for tool registry operations.
pub type ToolResult<T> = Result<T, ToolError>;
