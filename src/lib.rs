//! # Cadre
//!
//! Cadre is an in-process multi-agent orchestration engine. It routes
//! messages to role-specific agents, keeps per-session context, invokes
//! tools, and talks to interchangeable text-generation backends.
//!
//! ## Core Components
//!
//! - **[Agent] / [RoleAgent]**: message → plan → tool or reply → recorded interaction
//! - **[ContextStore]**: per-agent session context with bounded compaction
//! - **[ToolRegistry]**: name-keyed tools with contained failures
//! - **[BackendSelector]**: provider name → [Backend] whose `generate` never fails
//! - **[TaskCoordinator]**: registers agents, expands requests, assigns and runs tasks
//!
//! ## Quick Start
//!
//! ```rust
//! use cadre_workspace::{Backend, GenerateOptions, Message, RoleAgent, RoleKind, Agent};
//!
//! struct Canned;
//!
//! impl Backend for Canned {
//!     fn provider(&self) -> &str {
//!         "canned"
//!     }
//!
//!     fn generate(&self, _prompt: &str, _options: &GenerateOptions) -> String {
//!         "Start with Lisbon, then Porto.".to_string()
//!     }
//! }
//!
//! let mut agent = RoleAgent::new("planner", RoleKind::TravelPlanner, Box::new(Canned));
//! let reply = agent.process_message(Message::user("Two weeks in Portugal?"), "s1");
//! assert_eq!(reply.content, "Start with Lisbon, then Porto.");
//!
//! let reply = agent.process_message(Message::user("search for trains"), "s1");
//! assert!(reply.content.starts_with("Tool execution result:"));
//! ```

pub use cadre_agent::{Agent, RoleAgent, RoleKind, SelectionPolicy, TaskCoordinator};
pub use cadre_backend::{BackendSelector, Provider, TracingObserver};
pub use cadre_core::{
    AgentResponse, Backend, CallObserver, CadreError, CadreResult, ErrorPayload, GenerateOptions,
    Interaction, Message, MessageRole, NoopObserver, Plan, Settings, SettingsBuilder, Task,
    TaskReport, TaskRequirements, Tool, ToolError,
};
pub use cadre_memory::{CompactionPolicy, ContextStore, InteractionRetention};
pub use cadre_tools::{FunctionTool, InMemoryToolRegistry, ToolRegistry};
