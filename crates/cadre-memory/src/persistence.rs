use crate::context::MemorySnapshot;
use cadre_core::error::MemoryResult;
use chrono::Duration;

/// Extension point for durable storage of a context store.
///
/// The engine calls these hooks only when a host asks it to
/// (`save_to_storage`, `load_from_storage`, `cleanup_old_sessions`).
pub trait MemoryPersistence: Send + Sync {
    /// Persist the full state of the store owned by `owner`.
    fn save(&self, owner: &str, snapshot: &MemorySnapshot) -> MemoryResult<()>;

    /// Load previously persisted state, if any.
    fn load(&self, owner: &str) -> MemoryResult<Option<MemorySnapshot>>;

    /// Remove persisted sessions idle for longer than `max_age`.
    ///
    /// Returns how many sessions were removed.
    fn cleanup(&self, _owner: &str, _max_age: Duration) -> MemoryResult<usize> {
        Ok(0)
    }
}

/// Persistence that stores nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopPersistence;

impl MemoryPersistence for NoopPersistence {
    fn save(&self, _owner: &str, _snapshot: &MemorySnapshot) -> MemoryResult<()> {
        Ok(())
    }

    fn load(&self, _owner: &str) -> MemoryResult<Option<MemorySnapshot>> {
        Ok(None)
    }
}
