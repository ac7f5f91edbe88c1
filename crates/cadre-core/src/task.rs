//! Coordinator-level units of work.

use crate::message::AgentResponse;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle of a task.
///
/// `Assigned` is terminal: executing a task does not advance it further.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    Created,
    Assigned,
}

/// Capabilities a task asks for.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRequirements {
    #[serde(default)]
    pub capabilities: Vec<String>,
}

impl TaskRequirements {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_capability(mut self, capability: impl Into<String>) -> Self {
        self.capabilities.push(capability.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.capabilities.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    #[serde(rename = "type")]
    pub task_type: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub requirements: TaskRequirements,
    #[serde(default)]
    pub status: TaskStatus,
}

impl Task {
    pub fn new(task_type: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            task_type: task_type.into(),
            description: description.into(),
            requirements: TaskRequirements::default(),
            status: TaskStatus::Created,
        }
    }

    #[must_use]
    pub fn with_requirements(mut self, requirements: TaskRequirements) -> Self {
        self.requirements = requirements;
        self
    }

    #[must_use]
    pub fn with_capability(mut self, capability: impl Into<String>) -> Self {
        self.requirements.capabilities.push(capability.into());
        self
    }
}

/// A dispatched task waiting in the coordinator's queue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskQueueEntry {
    pub id: Uuid,
    pub agent_id: String,
    pub task: Task,
    pub status: TaskStatus,
}

/// Output of `analyze_request`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestAnalysis {
    pub tasks: Vec<Task>,
}

/// Summary returned by `execute_task`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskReport {
    pub agent_id: String,
    pub task_type: String,
    pub result: String,
    pub details: AgentResponse,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_new_task_starts_created() {
        let task = Task::new("budget_planning", "Create a budget plan for: Rome")
            .with_capability("cost_estimation");
        assert_eq!(task.status, TaskStatus::Created);
        assert_eq!(task.requirements.capabilities, vec!["cost_estimation"]);
    }

    #[test]
    fn test_task_deserializes_from_minimal_object() {
        let task: Task = serde_json::from_value(json!({
            "type": "local_guidance",
            "description": "Provide local guidance for: Kyoto"
        }))
        .unwrap();

        assert_eq!(task.task_type, "local_guidance");
        assert_eq!(task.status, TaskStatus::Created);
        assert!(task.requirements.is_empty());
    }

    #[test]
    fn test_status_serializes_snake_case() {
        assert_eq!(
            serde_json::to_value(TaskStatus::Assigned).unwrap(),
            json!("assigned")
        );
    }
}
