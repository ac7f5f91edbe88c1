//! # Tool Interface
//!
//! A tool is a named, schema-described operation an agent's plan can invoke.
//! Every tool states its name, description and parameter schema explicitly;
//! registries validate those at registration via [`validate_tool`].

use crate::error::ToolError;
use crate::plan::ToolParameters;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// A validated tool name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ToolName(String);

/// Errors that can occur when creating a `ToolName`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidToolName {
    /// Tool name is empty or contains only whitespace.
    #[error("Tool name cannot be empty")]
    Empty,
    /// Tool name exceeds the maximum allowed length.
    #[error("Tool name too long: {0} characters (max 64)")]
    TooLong(usize),
    /// Tool name contains invalid characters.
    #[error("Tool name contains invalid characters: '{0}'")]
    InvalidChars(String),
}

impl ToolName {
    /// Maximum allowed length for tool names.
    pub const MAX_LENGTH: usize = 64;

    /// Create a new validated tool name.
    ///
    /// # Validation Rules
    ///
    /// - Must not be empty or only whitespace
    /// - Must not exceed 64 characters
    /// - Must contain only alphanumeric characters, underscores, and hyphens
    ///
    /// # Example
    ///
    /// ```rust
    /// use cadre_core::ToolName;
    ///
    /// let name = ToolName::new("calculator").unwrap();
    /// assert_eq!(name.as_str(), "calculator");
    /// ```
    pub fn new(name: &str) -> Result<Self, InvalidToolName> {
        let trimmed = name.trim();

        if trimmed.is_empty() {
            return Err(InvalidToolName::Empty);
        }

        if trimmed.len() > Self::MAX_LENGTH {
            return Err(InvalidToolName::TooLong(trimmed.len()));
        }

        if !trimmed
            .chars()
            .all(|c| c.is_alphanumeric() || c == '_' || c == '-')
        {
            return Err(InvalidToolName::InvalidChars(trimmed.to_string()));
        }

        Ok(ToolName(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ToolName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for ToolName {
    type Error = InvalidToolName;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        ToolName::new(&value)
    }
}

impl From<ToolName> for String {
    fn from(name: ToolName) -> Self {
        name.0
    }
}

impl AsRef<str> for ToolName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Categorized failure reasons for tool execution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FailureReason {
    /// A required parameter was absent or had the wrong type
    MissingParameter {
        /// Parameter name
        name: String,
    },
    /// Invalid or malformed input provided to the tool
    InvalidInput {
        /// Description of what was invalid
        message: String,
    },
    /// Internal tool error or unexpected state
    InternalError {
        /// Description of the internal error
        message: String,
    },
}

impl FailureReason {
    /// Get a human-readable error message
    pub fn message(&self) -> String {
        match self {
            FailureReason::MissingParameter { name } => {
                format!("Missing required parameter: {}", name)
            }
            FailureReason::InvalidInput { message } => format!("Invalid input: {}", message),
            FailureReason::InternalError { message } => format!("Internal error: {}", message),
        }
    }
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}

/// The result of executing a tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionResult {
    /// Tool executed successfully with the given output.
    Success { output: String },

    /// Tool execution failed with a structured reason.
    Failure { reason: FailureReason },
}

impl ExecutionResult {
    pub fn success(output: impl Into<String>) -> Self {
        ExecutionResult::Success {
            output: output.into(),
        }
    }

    pub fn failed(reason: FailureReason) -> Self {
        ExecutionResult::Failure { reason }
    }

    /// Create a failed execution result from a plain error message.
    ///
    /// The message is wrapped in `FailureReason::InternalError`.
    pub fn failure(error_message: impl Into<String>) -> Self {
        ExecutionResult::Failure {
            reason: FailureReason::InternalError {
                message: error_message.into(),
            },
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ExecutionResult::Success { .. })
    }

    /// Get the output string (for success) or error message (for failure).
    pub fn output(&self) -> String {
        match self {
            ExecutionResult::Success { output } => output.clone(),
            ExecutionResult::Failure { reason } => reason.message(),
        }
    }

    /// Convert to a Result type for easier error handling.
    pub fn into_result(self) -> Result<String, FailureReason> {
        match self {
            ExecutionResult::Success { output } => Ok(output),
            ExecutionResult::Failure { reason } => Err(reason),
        }
    }
}

/// An invocable operation with explicit metadata.
///
/// # Example
///
/// ```rust
/// use cadre_core::{ExecutionResult, Tool, ToolParameters};
/// use serde_json::json;
///
/// struct UppercaseTool;
///
/// impl Tool for UppercaseTool {
///     fn name(&self) -> &str {
///         "uppercase"
///     }
///
///     fn description(&self) -> &str {
///         "Uppercases the given text"
///     }
///
///     fn parameter_schema(&self) -> serde_json::Value {
///         json!({"type": "object", "properties": {"text": {"type": "string"}}})
///     }
///
///     fn call(&self, parameters: &ToolParameters) -> ExecutionResult {
///         match parameters.get("text").and_then(|v| v.as_str()) {
///             Some(text) => ExecutionResult::success(text.to_uppercase()),
///             None => ExecutionResult::failure("text is required"),
///         }
///     }
/// }
/// ```
pub trait Tool: Send + Sync {
    /// Unique name used by the registry to route calls.
    fn name(&self) -> &str;

    /// Human-readable description used when building planning prompts.
    fn description(&self) -> &str;

    /// JSON Schema (an object schema) describing accepted parameters.
    fn parameter_schema(&self) -> serde_json::Value;

    /// Execute the tool with the provided parameters.
    fn call(&self, parameters: &ToolParameters) -> ExecutionResult;
}

/// Name and description only; the projection shown to the planner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolInfo {
    pub name: String,
    pub description: String,
}

impl ToolInfo {
    pub fn of(tool: &dyn Tool) -> Self {
        Self {
            name: tool.name().to_string(),
            description: tool.description().to_string(),
        }
    }
}

/// Check the required metadata of a tool before it is registered.
pub fn validate_tool(tool: &dyn Tool) -> Result<ToolName, ToolError> {
    let name = ToolName::new(tool.name())
        .map_err(|e| ToolError::invalid_definition(tool.name(), e.to_string()))?;

    if tool.description().trim().is_empty() {
        return Err(ToolError::invalid_definition(
            name.as_str(),
            "description cannot be empty",
        ));
    }

    if !tool.parameter_schema().is_object() {
        return Err(ToolError::invalid_definition(
            name.as_str(),
            "parameter schema must be a JSON object",
        ));
    }

    Ok(name)
}

/// Read a required string parameter.
pub fn string_param<'a>(
    parameters: &'a ToolParameters,
    key: &str,
) -> Result<&'a str, FailureReason> {
    parameters
        .get(key)
        .and_then(|value| value.as_str())
        .ok_or_else(|| FailureReason::MissingParameter {
            name: key.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    struct DescribedTool {
        name: &'static str,
        description: &'static str,
        schema: serde_json::Value,
    }

    impl Tool for DescribedTool {
        fn name(&self) -> &str {
            self.name
        }

        fn description(&self) -> &str {
            self.description
        }

        fn parameter_schema(&self) -> serde_json::Value {
            self.schema.clone()
        }

        fn call(&self, _parameters: &ToolParameters) -> ExecutionResult {
            ExecutionResult::success("ok")
        }
    }

    #[rstest]
    #[case("search", true)]
    #[case("weather-lookup", true)]
    #[case("currency_convert", true)]
    #[case("", false)]
    #[case("   ", false)]
    #[case("has space", false)]
    #[case("semi;colon", false)]
    fn test_tool_name_validation(#[case] input: &str, #[case] valid: bool) {
        assert_eq!(ToolName::new(input).is_ok(), valid);
    }

    #[test]
    fn test_tool_name_too_long() {
        let long = "a".repeat(ToolName::MAX_LENGTH + 1);
        assert_eq!(
            ToolName::new(&long),
            Err(InvalidToolName::TooLong(ToolName::MAX_LENGTH + 1))
        );
    }

    #[test]
    fn test_execution_result_into_result() {
        assert_eq!(
            ExecutionResult::success("ok").into_result(),
            Ok("ok".to_string())
        );
        assert_eq!(
            ExecutionResult::failure("disk full").into_result(),
            Err(FailureReason::InternalError {
                message: "disk full".to_string()
            })
        );
    }

    #[test]
    fn test_validate_tool_accepts_complete_definition() {
        let tool = DescribedTool {
            name: "search",
            description: "Search the web",
            schema: json!({"type": "object"}),
        };
        assert_eq!(validate_tool(&tool).unwrap().as_str(), "search");
    }

    #[test]
    fn test_validate_tool_rejects_missing_description() {
        let tool = DescribedTool {
            name: "search",
            description: " ",
            schema: json!({"type": "object"}),
        };
        let err = validate_tool(&tool).unwrap_err();
        assert_eq!(err.kind(), "InvalidToolDefinition");
        assert!(err.to_string().contains("description"));
    }

    #[test]
    fn test_validate_tool_rejects_non_object_schema() {
        let tool = DescribedTool {
            name: "search",
            description: "Search the web",
            schema: json!("string"),
        };
        assert!(validate_tool(&tool).is_err());
    }

    #[test]
    fn test_string_param() {
        let mut parameters = ToolParameters::new();
        parameters.insert("query".to_string(), json!("rome"));
        parameters.insert("limit".to_string(), json!(3));

        assert_eq!(string_param(&parameters, "query"), Ok("rome"));
        assert_eq!(
            string_param(&parameters, "limit"),
            Err(FailureReason::MissingParameter {
                name: "limit".to_string()
            })
        );
    }

    #[test]
    fn test_failure_reason_serialization() {
        let reason = FailureReason::MissingParameter {
            name: "query".to_string(),
        };
        let value = serde_json::to_value(&reason).unwrap();
        assert_eq!(value, json!({"type": "missing_parameter", "name": "query"}));
    }
}
