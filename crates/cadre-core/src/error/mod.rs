//! Error Types
//!
//! Every component converts its own failures into data at its boundary.
//! These enums are the typed form of those failures before they are folded
//! into responses or serialized as `{"error": "..."}` payloads.
//!
//! - `tool`: registry lookup and executor failures
//! - `backend`: provider call failures, contained inside the backend
//! - `memory`: context store persistence and snapshot failures
//! - `agent`: agent pipeline and coordinator lookup failures
//! - `conversions`: the umbrella `CadreError` and boundary payloads

mod agent;
mod backend;
mod conversions;
mod memory;
mod tool;

pub use agent::{AgentError, AgentResult, CoordinatorError, CoordinatorResult};
pub use backend::{BackendError, BackendResult};
pub use conversions::{CadreError, CadreResult, ErrorPayload, panic_message};
pub use memory::{MemoryError, MemoryResult};
pub use tool::{ToolError, ToolResult};
