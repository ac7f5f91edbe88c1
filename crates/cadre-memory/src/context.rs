use crate::persistence::{MemoryPersistence, NoopPersistence};
use crate::policy::{CompactionPolicy, InteractionRetention};
use cadre_core::error::{MemoryError, MemoryResult};
use cadre_core::{AgentResponse, ContextSettings, Interaction, Message, Plan};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};

/// Context and interaction log for one session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    pub context: Vec<Message>,
    pub interactions: Vec<Interaction>,
}

/// Serializable copy of a store's sessions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemorySnapshot {
    pub owner: String,
    pub taken_at: DateTime<Utc>,
    pub sessions: BTreeMap<String, SessionState>,
}

impl MemorySnapshot {
    pub fn to_json(&self) -> MemoryResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> MemoryResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Per-agent, session-keyed conversation state.
///
/// Each session owns an ordered context (compacted by [`CompactionPolicy`])
/// and an interaction log (bounded only by [`InteractionRetention`]).
/// Sessions are created on first use and live until pruned.
///
/// The store is not synchronized; callers serialize access per agent.
///
/// # Example
///
/// ```rust
/// use cadre_memory::ContextStore;
/// use cadre_core::Message;
///
/// let mut store = ContextStore::new("planner");
/// store.update_context("s1", Message::user("hello"));
///
/// assert_eq!(store.get_context("s1").len(), 1);
/// assert!(store.get_context("unknown").is_empty());
/// ```
pub struct ContextStore {
    owner: String,
    policy: CompactionPolicy,
    retention: InteractionRetention,
    sessions: HashMap<String, SessionState>,
    persistence: Arc<dyn MemoryPersistence>,
}

impl ContextStore {
    /// Create an empty store with the default policy and no persistence.
    pub fn new(owner: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            policy: CompactionPolicy::default(),
            retention: InteractionRetention::default(),
            sessions: HashMap::new(),
            persistence: Arc::new(NoopPersistence),
        }
    }

    /// Create a store using the context section of the settings.
    pub fn from_settings(owner: impl Into<String>, settings: &ContextSettings) -> Self {
        Self::new(owner)
            .with_policy(CompactionPolicy::from(settings))
            .with_retention(InteractionRetention::from(settings))
    }

    #[must_use]
    pub fn with_policy(mut self, policy: CompactionPolicy) -> Self {
        self.policy = policy;
        self
    }

    #[must_use]
    pub fn with_retention(mut self, retention: InteractionRetention) -> Self {
        self.retention = retention;
        self
    }

    #[must_use]
    pub fn with_persistence(mut self, persistence: Arc<dyn MemoryPersistence>) -> Self {
        self.persistence = persistence;
        self
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn policy(&self) -> CompactionPolicy {
        self.policy
    }

    pub fn retention(&self) -> InteractionRetention {
        self.retention
    }

    /// Append a message to a session's context, compacting if it grew past
    /// the policy's limit.
    pub fn update_context(&mut self, session_id: &str, message: Message) {
        let session = self.sessions.entry(session_id.to_string()).or_default();
        session.context.push(message);
        let len = session.context.len();

        debug!(owner = %self.owner, session_id, context_len = len, "Context updated");

        if self.policy.should_compact(len) {
            self.compress_context(session_id);
        }
    }

    /// Drop all but the most recent `retain` context entries of a session.
    pub fn compress_context(&mut self, session_id: &str) {
        let retain = self.policy.retain();
        let Some(session) = self.sessions.get_mut(session_id) else {
            return;
        };

        let len = session.context.len();
        if len > retain {
            session.context.drain(..len - retain);
            info!(
                owner = %self.owner,
                session_id,
                dropped = len - retain,
                retained = retain,
                "Context compacted"
            );
        }
    }

    /// Current context of a session, oldest first. Empty for unknown sessions.
    pub fn get_context(&self, session_id: &str) -> &[Message] {
        self.sessions
            .get(session_id)
            .map(|session| session.context.as_slice())
            .unwrap_or(&[])
    }

    /// The last `limit` context entries of a session, oldest first.
    pub fn recent_context(&self, session_id: &str, limit: usize) -> &[Message] {
        let context = self.get_context(session_id);
        &context[context.len().saturating_sub(limit)..]
    }

    /// Append one interaction record to a session's log.
    pub fn store_interaction(
        &mut self,
        session_id: &str,
        input: Message,
        output: AgentResponse,
        plan: Plan,
    ) {
        let session = self.sessions.entry(session_id.to_string()).or_default();
        session
            .interactions
            .push(Interaction::new(input, output, plan));

        if let Some(limit) = self.retention.limit() {
            let len = session.interactions.len();
            if len > limit {
                session.interactions.drain(..len - limit);
            }
        }

        debug!(
            owner = %self.owner,
            session_id,
            interactions = session.interactions.len(),
            "Interaction stored"
        );
    }

    /// Interaction records of a session in insertion order.
    pub fn get_interaction_history(&self, session_id: &str) -> &[Interaction] {
        self.sessions
            .get(session_id)
            .map(|session| session.interactions.as_slice())
            .unwrap_or(&[])
    }

    pub fn interaction_count(&self, session_id: &str) -> usize {
        self.get_interaction_history(session_id).len()
    }

    pub fn has_session(&self, session_id: &str) -> bool {
        self.sessions.contains_key(session_id)
    }

    /// Known session ids, sorted.
    pub fn session_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.sessions.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    /// Forget a session entirely. Returns whether it existed.
    pub fn prune_session(&mut self, session_id: &str) -> bool {
        let existed = self.sessions.remove(session_id).is_some();
        if existed {
            info!(owner = %self.owner, session_id, "Session pruned");
        }
        existed
    }

    /// Copy the current state into a serializable snapshot.
    pub fn snapshot(&self) -> MemorySnapshot {
        MemorySnapshot {
            owner: self.owner.clone(),
            taken_at: Utc::now(),
            sessions: self
                .sessions
                .iter()
                .map(|(id, state)| (id.clone(), state.clone()))
                .collect(),
        }
    }

    /// Replace the current state with a snapshot taken from the same owner.
    ///
    /// # Errors
    ///
    /// Returns `MemoryError::Snapshot` if the snapshot belongs to another owner.
    pub fn restore(&mut self, snapshot: MemorySnapshot) -> MemoryResult<()> {
        if snapshot.owner != self.owner {
            return Err(MemoryError::Snapshot(format!(
                "snapshot belongs to '{}', not '{}'",
                snapshot.owner, self.owner
            )));
        }
        self.sessions = snapshot.sessions.into_iter().collect();
        Ok(())
    }

    /// Hand the current state to the persistence hook.
    pub fn save_to_storage(&self) -> MemoryResult<()> {
        self.persistence.save(&self.owner, &self.snapshot())
    }

    /// Restore state from the persistence hook.
    ///
    /// Returns `false` when the hook had nothing stored.
    pub fn load_from_storage(&mut self) -> MemoryResult<bool> {
        match self.persistence.load(&self.owner)? {
            Some(snapshot) => {
                self.restore(snapshot)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Ask the persistence hook to drop sessions idle longer than `max_age`.
    ///
    /// In-memory sessions are left alone; use [`ContextStore::prune_session`]
    /// for those.
    pub fn cleanup_old_sessions(&self, max_age: Duration) -> MemoryResult<usize> {
        self.persistence.cleanup(&self.owner, max_age)
    }
}

impl fmt::Debug for ContextStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContextStore")
            .field("owner", &self.owner)
            .field("policy", &self.policy)
            .field("retention", &self.retention)
            .field("sessions", &self.sessions.len())
            .finish_non_exhaustive()
    }
}
