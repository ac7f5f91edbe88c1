//! # Cadre Testing
//!
//! Deterministic stand-ins for the external collaborators of an agent:
//!
//! - [`ScriptedBackend`]: replays queued responses and records every prompt
//! - [`FailingBackend`]: always answers with contained failure text
//! - [`RecordingObserver`]: collects every [`cadre_core::BackendCall`]
//! - [`MockTool`]: a tool with canned responses and call history
//!
//! All of them share their recorded state through `Arc`, so a clone kept by
//! the test sees calls made through the copy handed to the agent.

pub mod backends;
pub mod mock_tools;

pub use backends::{FailingBackend, RecordingObserver, ScriptedBackend};
pub use mock_tools::MockTool;
