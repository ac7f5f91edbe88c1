//! # Cadre Agents
//!
//! Role-specialized agents and the coordinator that hands them work.
//!
//! An agent is one [`RoleAgent`] struct configured from the [`RoleKind`]
//! table: the role decides the role text, the bound tools and the keyword
//! triggers that turn a generated plan into a tool call. The
//! [`TaskCoordinator`] registers agents by role type, expands requests into
//! sub-tasks and dispatches them.

pub mod agent;
pub mod coordinator;
pub mod planning;
pub mod role;

pub use agent::{Agent, INTERNAL_FAULT_PREFIX, RoleAgent, UNKNOWN_ACTION_REPLY};
pub use coordinator::{SelectionPolicy, TaskCoordinator};
pub use planning::{build_planning_prompt, classify_plan};
pub use role::{ParameterSource, RoleKind, Trigger};
