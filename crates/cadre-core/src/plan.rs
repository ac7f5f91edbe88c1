//! The action an agent decides to take for a message.

use serde::{Deserialize, Serialize};

/// Named arguments passed to a tool executor.
pub type ToolParameters = serde_json::Map<String, serde_json::Value>;

/// An agent's chosen next action.
///
/// Serialized with an `action` tag. Any action string other than
/// `respond` or `use_tool` deserializes to [`Plan::Unknown`], which
/// `execute_plan` answers with a fixed apology.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Plan {
    /// Reply directly with the given text.
    Respond { content: String },
    /// Invoke a bound tool.
    UseTool {
        tool_name: String,
        #[serde(default)]
        parameters: ToolParameters,
    },
    /// An action this engine does not understand.
    #[serde(other)]
    Unknown,
}

impl Plan {
    pub fn respond(content: impl Into<String>) -> Self {
        Plan::Respond {
            content: content.into(),
        }
    }

    pub fn use_tool(tool_name: impl Into<String>, parameters: ToolParameters) -> Self {
        Plan::UseTool {
            tool_name: tool_name.into(),
            parameters,
        }
    }

    /// The serialized action tag.
    pub fn action(&self) -> &'static str {
        match self {
            Plan::Respond { .. } => "respond",
            Plan::UseTool { .. } => "use_tool",
            Plan::Unknown => "unknown",
        }
    }

    pub fn tool_name(&self) -> Option<&str> {
        match self {
            Plan::UseTool { tool_name, .. } => Some(tool_name),
            _ => None,
        }
    }

    pub fn is_tool_call(&self) -> bool {
        matches!(self, Plan::UseTool { .. })
    }
}

/// Build a single-entry parameter map.
pub fn single_parameter(key: &str, value: impl Into<String>) -> ToolParameters {
    let mut parameters = ToolParameters::new();
    parameters.insert(key.to_string(), serde_json::Value::String(value.into()));
    parameters
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_use_tool_serialization() {
        let plan = Plan::use_tool("search", single_parameter("query", "lisbon"));
        let value = serde_json::to_value(&plan).unwrap();
        assert_eq!(
            value,
            json!({"action": "use_tool", "tool_name": "search", "parameters": {"query": "lisbon"}})
        );
    }

    #[test]
    fn test_unrecognized_action_becomes_unknown() {
        let plan: Plan = serde_json::from_value(json!({"action": "teleport"})).unwrap();
        assert_eq!(plan, Plan::Unknown);
        assert_eq!(plan.action(), "unknown");
    }

    #[test]
    fn test_respond_accessors() {
        let plan = Plan::respond("hello");
        assert!(!plan.is_tool_call());
        assert_eq!(plan.tool_name(), None);
        assert_eq!(plan.action(), "respond");
    }
}
