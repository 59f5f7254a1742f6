use std::collections::HashMap;
use std::fmt;
use std::time::{Duration, Instant};

use tracing::debug;

use crate::session::state::Session;

/// Identifies one conversation (a chat user id for Telegram).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(pub i64);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Optional bounds on how many sessions are kept and for how long.
///
/// Both default to `None`: sessions live for the life of the process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreLimits {
    /// Sessions idle for longer than this are dropped by `evict_idle`.
    pub idle_ttl: Option<Duration>,
    /// When full, inserting a new session evicts the least recently seen one.
    pub max_sessions: Option<usize>,
}

struct Entry {
    session: Session,
    last_seen: Instant,
}

/// Map from session id to session record, creating records on first use.
pub struct SessionStore {
    entries: HashMap<SessionId, Entry>,
    limits: StoreLimits,
}

impl SessionStore {
    pub fn new(limits: StoreLimits) -> Self {
        Self {
            entries: HashMap::new(),
            limits,
        }
    }

    pub fn limits(&self) -> &StoreLimits {
        &self.limits
    }

    /// Get the session for `id`, creating an empty one if needed, and mark
    /// it as seen at `now`.
    pub fn session_mut(&mut self, id: SessionId, now: Instant) -> &mut Session {
        if !self.entries.contains_key(&id) {
            if let Some(max) = self.limits.max_sessions
                && self.entries.len() >= max
            {
                self.evict_least_recent();
            }
            debug!(session = %id, "session created");
        }

        let entry = self.entries.entry(id).or_insert_with(|| Entry {
            session: Session::new(),
            last_seen: now,
        });
        entry.last_seen = now;
        &mut entry.session
    }

    pub fn get(&self, id: SessionId) -> Option<&Session> {
        self.entries.get(&id).map(|e| &e.session)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop sessions idle longer than the configured TTL. Returns how many
    /// were removed; a store without a TTL never evicts.
    pub fn evict_idle(&mut self, now: Instant) -> usize {
        let Some(ttl) = self.limits.idle_ttl else {
            return 0;
        };

        let before = self.entries.len();
        self.entries
            .retain(|_, e| now.saturating_duration_since(e.last_seen) <= ttl);
        let evicted = before - self.entries.len();
        if evicted > 0 {
            debug!(evicted, remaining = self.entries.len(), "idle sessions evicted");
        }
        evicted
    }

    fn evict_least_recent(&mut self) {
        let oldest = self
            .entries
            .iter()
            .min_by_key(|(_, e)| e.last_seen)
            .map(|(id, _)| *id);
        if let Some(id) = oldest {
            self.entries.remove(&id);
            debug!(session = %id, "least recently seen session evicted");
        }
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(StoreLimits::default())
    }
}
