//! Conversation messages, agent responses and interaction records.

use crate::backend::ERROR_MARKER;
use crate::plan::Plan;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Who authored a message.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// Message from a user/client
    #[default]
    User,
    /// Message produced by an agent
    Assistant,
    /// System instruction
    System,
}

impl MessageRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageRole::User => "user",
            MessageRole::Assistant => "assistant",
            MessageRole::System => "system",
        }
    }
}

impl fmt::Display for MessageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single conversational message.
///
/// Messages are never mutated once appended to a context; compaction only
/// drops whole entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    #[serde(default)]
    pub role: MessageRole,
    pub content: String,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub metadata: HashMap<String, serde_json::Value>,
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,
}

impl Message {
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            metadata: HashMap::new(),
            timestamp: Utc::now(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(MessageRole::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(MessageRole::Assistant, content)
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(MessageRole::System, content)
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }
}

/// The envelope returned by `process_message`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentResponse {
    pub role: MessageRole,
    pub content: String,
    pub agent_id: String,
}

impl AgentResponse {
    /// Build an assistant response for the given agent.
    pub fn new(agent_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
            agent_id: agent_id.into(),
        }
    }

    /// Whether the content carries a contained backend failure.
    pub fn is_error(&self) -> bool {
        self.content.contains(ERROR_MARKER)
    }

    /// Convert into a context message tagged with the producing agent.
    pub fn to_message(&self) -> Message {
        Message::new(self.role, self.content.clone())
            .with_metadata("agent_id", serde_json::Value::String(self.agent_id.clone()))
    }
}

/// Audit record for one `process_message` cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interaction {
    pub input: Message,
    pub output: AgentResponse,
    pub plan: Plan,
    #[serde(default = "Utc::now")]
    pub recorded_at: DateTime<Utc>,
}

impl Interaction {
    pub fn new(input: Message, output: AgentResponse, plan: Plan) -> Self {
        Self {
            input,
            output,
            plan,
            recorded_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_role_serializes_lowercase() {
        let message = Message::assistant("hello");
        let json = serde_json::to_value(&message).unwrap();
        assert_eq!(json["role"], "assistant");
        assert!(json.get("metadata").is_none());
    }

    #[test]
    fn test_message_deserializes_without_optional_fields() {
        let message: Message = serde_json::from_str(r#"{"content":"hi"}"#).unwrap();
        assert_eq!(message.role, MessageRole::User);
        assert_eq!(message.content, "hi");
        assert!(message.metadata.is_empty());
    }

    #[test]
    fn test_response_envelope_shape() {
        let response = AgentResponse::new("planner", "Try Lisbon");
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["role"], "assistant");
        assert_eq!(json["content"], "Try Lisbon");
        assert_eq!(json["agent_id"], "planner");
        assert!(!response.is_error());
    }

    #[test]
    fn test_response_detects_error_marker() {
        let response = AgentResponse::new(
            "planner",
            "Error generating response with OpenAI: HTTP 500: boom",
        );
        assert!(response.is_error());
    }

    #[test]
    fn test_response_to_message_keeps_agent_id() {
        let message = AgentResponse::new("guide", "hi").to_message();
        assert_eq!(message.role, MessageRole::Assistant);
        assert_eq!(message.metadata["agent_id"], "guide");
    }
}
