//! # Task Coordinator
//!
//! Registers agents by role type, expands requests into sub-tasks and hands
//! each task to an agent.
//!
//! Task lifecycle is `created -> assigned`. Execution through
//! [`TaskCoordinator::execute_task`] does not touch the queue entry written
//! at dispatch.

use crate::agent::{Agent, RoleAgent};
use crate::role::RoleKind;
use cadre_backend::BackendSelector;
use cadre_core::{
    CoordinatorError, Interaction, Message, RequestAnalysis, Settings, Task, TaskQueueEntry,
    TaskReport, TaskRequirements, TaskStatus,
};
use std::fmt;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Message synthesized for a task without a description.
const FALLBACK_TASK_MESSAGE: &str = "Please help with this task";

/// Which registered agents count as candidates for a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionPolicy {
    /// Every registered agent is a candidate, regardless of requirements.
    #[default]
    AcceptAll,
    /// Only agents sharing at least one required capability.
    CapabilityMatch,
}

/// Top-level controller over a set of agents.
pub struct TaskCoordinator {
    agents: Vec<Box<dyn Agent>>,
    task_queue: Vec<TaskQueueEntry>,
    selector: BackendSelector,
    policy: SelectionPolicy,
}

impl TaskCoordinator {
    pub fn new(selector: BackendSelector) -> Self {
        Self {
            agents: Vec::new(),
            task_queue: Vec::new(),
            selector,
            policy: SelectionPolicy::default(),
        }
    }

    pub fn from_settings(settings: Settings) -> Self {
        Self::new(BackendSelector::new(settings))
    }

    #[must_use]
    pub fn with_selection_policy(mut self, policy: SelectionPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn selection_policy(&self) -> SelectionPolicy {
        self.policy
    }

    /// Build and register a role agent.
    ///
    /// An unknown `agent_type` registers a `travel_planner`. Registering an
    /// existing id replaces that agent in place.
    pub fn register_agent(
        &mut self,
        agent_id: &str,
        agent_type: &str,
        capabilities: Vec<String>,
        backend_name: &str,
    ) {
        let role = RoleKind::from_type_name(agent_type).unwrap_or_else(|| {
            warn!(
                agent_id,
                agent_type,
                fallback = RoleKind::default().type_name(),
                "Unknown agent type, using default role"
            );
            RoleKind::default()
        });

        let backend = self.selector.get_provider(backend_name);
        let agent = RoleAgent::with_settings(
            agent_id,
            role,
            backend,
            &self.selector.settings().context,
        )
        .with_capabilities(capabilities);

        self.add_agent(Box::new(agent));
    }

    /// Register an already built agent.
    pub fn add_agent(&mut self, agent: Box<dyn Agent>) {
        info!(
            agent_id = agent.id(),
            role = agent.role_type(),
            capabilities = ?agent.capabilities(),
            "Agent registered"
        );
        match self.agents.iter_mut().find(|a| a.id() == agent.id()) {
            Some(existing) => *existing = agent,
            None => self.agents.push(agent),
        }
    }

    /// Expand a request into the fixed three sub-tasks.
    pub fn analyze_request(&self, user_request: &str) -> RequestAnalysis {
        let tasks = vec![
            Task::new(
                "destination_planning",
                format!("Plan travel destinations for: {user_request}"),
            )
            .with_capability("destination_recommendation"),
            Task::new(
                "local_guidance",
                format!("Provide local guidance for: {user_request}"),
            )
            .with_capability("local_knowledge"),
            Task::new(
                "budget_planning",
                format!("Create a budget plan for: {user_request}"),
            )
            .with_capability("cost_estimation"),
        ];
        debug!(tasks = tasks.len(), "Request analyzed");
        RequestAnalysis { tasks }
    }

    /// Pick an agent for `task` and enqueue it. `None` when no agent is a
    /// candidate.
    pub fn assign_task(&mut self, task: &Task, requirements: &TaskRequirements) -> Option<String> {
        let chosen = {
            let suitable = self.find_suitable_agents(requirements);
            self.select_best_agent(&suitable, task).map(str::to_string)
        };

        match chosen {
            Some(agent_id) => Some(self.dispatch_task(&agent_id, task)),
            None => {
                warn!(task_type = %task.task_type, "No suitable agent for task");
                None
            }
        }
    }

    /// Candidate agent ids in registration order under the current policy.
    pub fn find_suitable_agents(&self, requirements: &TaskRequirements) -> Vec<&str> {
        self.agents
            .iter()
            .filter(|agent| match self.policy {
                SelectionPolicy::AcceptAll => true,
                SelectionPolicy::CapabilityMatch => {
                    Self::matches_requirements(agent.as_ref(), requirements)
                }
            })
            .map(|agent| agent.id())
            .collect()
    }

    /// The first candidate.
    pub fn select_best_agent<'a>(&self, suitable: &[&'a str], _task: &Task) -> Option<&'a str> {
        suitable.first().copied()
    }

    /// True when nothing is required or the agent has any required
    /// capability.
    pub fn matches_requirements(agent: &dyn Agent, requirements: &TaskRequirements) -> bool {
        requirements.is_empty()
            || requirements
                .capabilities
                .iter()
                .any(|required| agent.capabilities().contains(required))
    }

    /// Enqueue an `assigned` entry and return the agent id.
    pub fn dispatch_task(&mut self, agent_id: &str, task: &Task) -> String {
        let mut task = task.clone();
        task.status = TaskStatus::Assigned;

        let entry = TaskQueueEntry {
            id: Uuid::new_v4(),
            agent_id: agent_id.to_string(),
            task,
            status: TaskStatus::Assigned,
        };
        info!(
            entry_id = %entry.id,
            agent_id,
            task_type = %entry.task.task_type,
            "Task dispatched"
        );
        self.task_queue.push(entry);
        agent_id.to_string()
    }

    /// Run `task` on an agent as a user message.
    pub fn execute_task(
        &mut self,
        agent_id: &str,
        task: &Task,
        session_id: &str,
    ) -> Result<TaskReport, CoordinatorError> {
        let agent = self
            .agents
            .iter_mut()
            .find(|agent| agent.id() == agent_id)
            .ok_or_else(|| {
                warn!(agent_id, "Agent not found");
                CoordinatorError::AgentNotFound(agent_id.to_string())
            })?;

        let content = if task.description.is_empty() {
            FALLBACK_TASK_MESSAGE
        } else {
            task.description.as_str()
        };

        debug!(agent_id, session_id, task_type = %task.task_type, "Executing task");
        let response = agent.process_message(Message::user(content), session_id);

        Ok(TaskReport {
            agent_id: agent_id.to_string(),
            task_type: task.task_type.clone(),
            result: response.content.clone(),
            details: response,
        })
    }

    /// Analyze, assign and execute every sub-task of a request.
    ///
    /// Tasks that find no agent are skipped.
    pub fn handle_request(
        &mut self,
        user_request: &str,
        session_id: &str,
    ) -> Result<Vec<TaskReport>, CoordinatorError> {
        let analysis = self.analyze_request(user_request);
        let mut reports = Vec::with_capacity(analysis.tasks.len());

        for task in &analysis.tasks {
            if let Some(agent_id) = self.assign_task(task, &task.requirements) {
                reports.push(self.execute_task(&agent_id, task, session_id)?);
            }
        }
        Ok(reports)
    }

    /// Interaction history of one agent's session.
    pub fn session_history(
        &self,
        agent_id: &str,
        session_id: &str,
    ) -> Result<&[Interaction], CoordinatorError> {
        let agent = self
            .agent(agent_id)
            .ok_or_else(|| CoordinatorError::AgentNotFound(agent_id.to_string()))?;

        let store = agent.context_store();
        if !store.has_session(session_id) {
            return Err(CoordinatorError::SessionUnknown {
                agent_id: agent_id.to_string(),
                session_id: session_id.to_string(),
            });
        }
        Ok(store.get_interaction_history(session_id))
    }

    pub fn task_queue(&self) -> &[TaskQueueEntry] {
        &self.task_queue
    }

    /// Registered agent ids in registration order.
    pub fn agent_ids(&self) -> Vec<&str> {
        self.agents.iter().map(|agent| agent.id()).collect()
    }

    pub fn agent(&self, agent_id: &str) -> Option<&dyn Agent> {
        self.agents
            .iter()
            .find(|agent| agent.id() == agent_id)
            .map(|agent| agent.as_ref())
    }

    pub fn agent_mut(&mut self, agent_id: &str) -> Option<&mut (dyn Agent + 'static)> {
        self.agents
            .iter_mut()
            .find(|agent| agent.id() == agent_id)
            .map(|agent| agent.as_mut())
    }

    pub fn selector(&self) -> &BackendSelector {
        &self.selector
    }
}

impl fmt::Debug for TaskCoordinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskCoordinator")
            .field("agents", &self.agent_ids())
            .field("queued", &self.task_queue.len())
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}
