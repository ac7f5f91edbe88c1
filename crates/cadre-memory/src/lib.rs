//! # Cadre Memory
//!
//! Session-keyed conversation state owned by a single agent: an ordered,
//! size-bounded context per session and an append-only interaction log.
//!
//! Nothing is shared between agents. Durable storage is reached only
//! through the [`MemoryPersistence`] hook, which does nothing by default.

mod context;
mod persistence;
mod policy;

pub use context::{ContextStore, MemorySnapshot, SessionState};
pub use persistence::{MemoryPersistence, NoopPersistence};
pub use policy::{CompactionPolicy, InteractionRetention};
