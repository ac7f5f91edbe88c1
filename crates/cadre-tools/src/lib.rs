//! # Cadre Tools
//!
//! The per-agent tool registry and the standard tool library.
//!
//! ## Standard Tools
//!
//! - `search`: offline web-search stand-in keyed by a `query` parameter
//! - `calculator`: arithmetic evaluation of an `expression` parameter
//!
//! Custom tools implement [`cadre_core::Tool`] directly or wrap a closure
//! in [`FunctionTool`].

/// Closure-backed tools.
pub mod function;
/// Tool registry implementations.
pub mod registry;
/// Standard tool library.
pub mod standard;

pub use cadre_core::{ExecutionResult, Tool, ToolInfo, ToolName, ToolParameters};
pub use function::FunctionTool;
pub use registry::{InMemoryToolRegistry, ToolOutcome, ToolRegistry};
pub use standard::{CalculatorTool, SearchTool, StandardTool};
