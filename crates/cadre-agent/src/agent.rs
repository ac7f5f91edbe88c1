//! The agent contract and its role-driven implementation.

use crate::planning::{build_planning_prompt, classify_plan};
use crate::role::RoleKind;
use cadre_core::error::panic_message;
use cadre_core::{
    AgentError, AgentResponse, Backend, ContextSettings, GenerateOptions, Message, Plan, Tool,
    ToolError,
};
use cadre_memory::ContextStore;
use cadre_tools::{InMemoryToolRegistry, ToolRegistry};
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use tracing::{Span, debug, error, info, info_span, warn};

/// Reply for a plan whose action is not understood.
pub const UNKNOWN_ACTION_REPLY: &str = "Sorry, I can't perform that action.";

/// Prefix of the reply produced when the pipeline itself faults.
pub const INTERNAL_FAULT_PREFIX: &str = "Sorry, something went wrong while processing your message";

/// A unit of behavior that turns a message into a response.
///
/// `process_message` never fails outward. Faults are rendered into the
/// content of the returned envelope.
pub trait Agent: Send {
    fn id(&self) -> &str;

    /// Registered role type, e.g. `travel_planner`.
    fn role_type(&self) -> &str;

    fn role_text(&self) -> &str;

    fn capabilities(&self) -> &[String];

    /// Update context, plan, execute and record one message.
    fn process_message(&mut self, message: Message, session_id: &str) -> AgentResponse;

    /// Choose the next action for `message` from recent context.
    fn plan_next_action(&self, message: &Message, session_id: &str) -> Plan;

    /// Carry out a plan and wrap the outcome in a response envelope.
    fn execute_plan(&self, plan: &Plan, session_id: &str) -> AgentResponse;

    fn context_store(&self) -> &ContextStore;
}

/// An agent whose behavior is fixed by its [`RoleKind`].
///
/// Owns its tool registry, backend and context store. Every call runs
/// inside the agent's own tracing span.
pub struct RoleAgent {
    id: String,
    role: RoleKind,
    capabilities: Vec<String>,
    tools: InMemoryToolRegistry,
    backend: Box<dyn Backend>,
    memory: ContextStore,
    planning_window: usize,
    plan_max_tokens: u32,
    span: Span,
}

impl RoleAgent {
    pub fn new(id: impl Into<String>, role: RoleKind, backend: Box<dyn Backend>) -> Self {
        Self::with_settings(id, role, backend, &ContextSettings::default())
    }

    /// Build an agent whose context policy and planning window come from
    /// `settings`.
    pub fn with_settings(
        id: impl Into<String>,
        role: RoleKind,
        backend: Box<dyn Backend>,
        settings: &ContextSettings,
    ) -> Self {
        let id = id.into();
        let span = info_span!("agent", agent_id = %id, role = role.type_name());

        let mut tools = InMemoryToolRegistry::new();
        for tool in role.tools() {
            if let Err(err) = tools.register_tool(tool.build()) {
                warn!(parent: &span, tool = tool.name(), error = %err, "Standard tool rejected");
            }
        }

        info!(
            parent: &span,
            provider = backend.provider(),
            tools = ?tools.tool_names(),
            "Agent initialized"
        );

        Self {
            memory: ContextStore::from_settings(id.clone(), settings),
            id,
            role,
            capabilities: Vec::new(),
            tools,
            backend,
            planning_window: settings.planning_window,
            plan_max_tokens: settings.plan_max_tokens,
            span,
        }
    }

    #[must_use]
    pub fn with_capabilities(mut self, capabilities: Vec<String>) -> Self {
        self.capabilities = capabilities;
        self
    }

    /// Bind an extra tool, replacing any tool of the same name.
    pub fn with_tool(mut self, tool: Arc<dyn Tool>) -> Result<Self, ToolError> {
        self.tools.register_tool(tool)?;
        Ok(self)
    }

    /// Replace the context store, e.g. to attach persistence hooks.
    #[must_use]
    pub fn with_context_store(mut self, store: ContextStore) -> Self {
        self.memory = store;
        self
    }

    pub fn role(&self) -> RoleKind {
        self.role
    }

    pub fn tools(&self) -> &InMemoryToolRegistry {
        &self.tools
    }

    pub fn backend(&self) -> &dyn Backend {
        self.backend.as_ref()
    }

    pub fn context_store_mut(&mut self) -> &mut ContextStore {
        &mut self.memory
    }

    fn run_pipeline(&mut self, message: Message, session_id: &str) -> AgentResponse {
        self.memory.update_context(session_id, message.clone());

        let plan = self.plan_next_action(&message, session_id);
        info!(
            session_id,
            action = plan.action(),
            tool = plan.tool_name(),
            "Plan selected"
        );

        let response = self.execute_plan(&plan, session_id);
        self.memory
            .store_interaction(session_id, message, response.clone(), plan);
        response
    }

    fn fault_response(&self, err: &AgentError) -> AgentResponse {
        AgentResponse::new(&self.id, format!("{INTERNAL_FAULT_PREFIX}: {err}"))
    }
}

impl Agent for RoleAgent {
    fn id(&self) -> &str {
        &self.id
    }

    fn role_type(&self) -> &str {
        self.role.type_name()
    }

    fn role_text(&self) -> &str {
        self.role.role_text()
    }

    fn capabilities(&self) -> &[String] {
        &self.capabilities
    }

    fn process_message(&mut self, message: Message, session_id: &str) -> AgentResponse {
        let span = self.span.clone();
        let _entered = span.enter();
        debug!(session_id, "Processing message");

        let outcome =
            panic::catch_unwind(AssertUnwindSafe(|| self.run_pipeline(message, session_id)));

        match outcome {
            Ok(response) => response,
            Err(payload) => {
                let err = AgentError::Panicked(panic_message(payload));
                error!(session_id, error_code = err.error_code(), error = %err, "Message processing faulted");
                self.fault_response(&err)
            }
        }
    }

    fn plan_next_action(&self, message: &Message, session_id: &str) -> Plan {
        let context = self.memory.recent_context(session_id, self.planning_window);
        let tools = self.tools.get_available_tools();
        debug!(
            session_id,
            context_len = context.len(),
            tools = tools.len(),
            "Building planning prompt"
        );

        let prompt = build_planning_prompt(self.role.role_text(), context, &message.content, &tools);
        let options = GenerateOptions::new().with_max_tokens(self.plan_max_tokens);
        let plan_text = self.backend.generate(&prompt, &options);

        classify_plan(self.role.triggers(), &plan_text, &message.content, |name| {
            self.tools.contains(name)
        })
    }

    fn execute_plan(&self, plan: &Plan, session_id: &str) -> AgentResponse {
        match plan {
            Plan::Respond { content } => AgentResponse::new(&self.id, content.clone()),
            Plan::UseTool {
                tool_name,
                parameters,
            } => {
                debug!(session_id, tool = %tool_name, "Executing tool");
                let content = match self.tools.execute(tool_name, parameters) {
                    Ok(result) => format!("Tool execution result: {result}"),
                    Err(err) => {
                        warn!(
                            session_id,
                            tool = %tool_name,
                            kind = err.kind(),
                            error = %err,
                            "Tool failure folded into response"
                        );
                        format!("Tool execution failed: {err}")
                    }
                };
                AgentResponse::new(&self.id, content)
            }
            Plan::Unknown => {
                warn!(session_id, "Unknown plan action");
                AgentResponse::new(&self.id, UNKNOWN_ACTION_REPLY)
            }
        }
    }

    fn context_store(&self) -> &ContextStore {
        &self.memory
    }
}

impl fmt::Debug for RoleAgent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RoleAgent")
            .field("id", &self.id)
            .field("role", &self.role)
            .field("capabilities", &self.capabilities)
            .field("tools", &self.tools.tool_names())
            .field("provider", &self.backend.provider())
            .finish_non_exhaustive()
    }
}
