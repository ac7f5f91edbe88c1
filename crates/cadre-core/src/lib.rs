//! # Cadre Core
//!
//! Shared types, traits and errors for the Cadre orchestration engine:
//! messages and plans, the `Tool` and `Backend` contracts, the task model,
//! and settings.

pub mod backend;
pub mod error;
pub mod message;
pub mod plan;
pub mod settings;
pub mod task;
pub mod tool;

pub use backend::{
    Backend, BackendCall, CallGuard, CallObserver, ERROR_MARKER, GenerateOptions, ModelParams,
    NoopObserver, is_error_text,
};
pub use error::{
    AgentError, BackendError, CadreError, CadreResult, CoordinatorError, ErrorPayload,
    MemoryError, ToolError,
};
pub use message::{AgentResponse, Interaction, Message, MessageRole};
pub use plan::{Plan, ToolParameters, single_parameter};
pub use settings::{ConfigError, ContextSettings, Settings, SettingsBuilder};
pub use task::{RequestAnalysis, Task, TaskQueueEntry, TaskReport, TaskRequirements, TaskStatus};
pub use tool::{
    ExecutionResult, FailureReason, InvalidToolName, Tool, ToolInfo, ToolName, string_param,
    validate_tool,
};
