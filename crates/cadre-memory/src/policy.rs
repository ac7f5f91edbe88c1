use cadre_core::ContextSettings;
use serde::{Deserialize, Serialize};

/// Entry-count compaction for session context.
///
/// When a context grows past `max_len` entries it is cut down to the most
/// recent `retain` entries. Older entries are dropped, not summarized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompactionPolicy {
    max_len: usize,
    retain: usize,
}

impl CompactionPolicy {
    pub const DEFAULT_MAX_LEN: usize = 50;
    pub const DEFAULT_RETAIN: usize = 20;

    /// Create a policy. `retain` is clamped into `1..=max_len`.
    pub fn new(max_len: usize, retain: usize) -> Self {
        let max_len = max_len.max(1);
        Self {
            max_len,
            retain: retain.clamp(1, max_len),
        }
    }

    pub fn max_len(&self) -> usize {
        self.max_len
    }

    pub fn retain(&self) -> usize {
        self.retain
    }

    pub fn should_compact(&self, len: usize) -> bool {
        len > self.max_len
    }
}

impl Default for CompactionPolicy {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MAX_LEN, Self::DEFAULT_RETAIN)
    }
}

/// How many interaction records a session keeps.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionRetention {
    /// Keep every record for the lifetime of the store.
    #[default]
    Unbounded,
    /// Keep only the most recent `n` records.
    KeepLast(usize),
}

impl InteractionRetention {
    pub fn limit(&self) -> Option<usize> {
        match self {
            InteractionRetention::Unbounded => None,
            InteractionRetention::KeepLast(n) => Some(*n),
        }
    }
}

impl From<&ContextSettings> for CompactionPolicy {
    fn from(settings: &ContextSettings) -> Self {
        Self::new(settings.max_len, settings.retain)
    }
}

impl From<&ContextSettings> for InteractionRetention {
    fn from(settings: &ContextSettings) -> Self {
        match settings.interaction_limit {
            Some(limit) => InteractionRetention::KeepLast(limit.max(1)),
            None => InteractionRetention::Unbounded,
        }
    }
}
