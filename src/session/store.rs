//! Session store
//!
//! `SessionStore` is the only way to reach a session. It hands out snapshots
//! and applies every mutation as a whole-record update inside the backend, so
//! no caller ever observes a half-applied turn.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::session::Session;
use crate::core::{RelayError, RelayResult};

/// Backing table for sessions
///
/// Every method is atomic with respect to the others. Implement this to put
/// sessions somewhere other than process memory.
pub trait SessionBackend: Send + Sync {
    /// Snapshot of one session
    fn get(&self, id: &str) -> Option<Session>;

    /// Insert unless the id is taken. Returns the stored session and whether
    /// it was inserted.
    fn insert_if_absent(&self, session: Session) -> (Session, bool);

    /// Mutate one session in place and return the updated snapshot
    fn update(&self, id: &str, apply: &mut dyn FnMut(&mut Session)) -> Option<Session>;

    /// Remove one session
    fn remove(&self, id: &str) -> Option<Session>;

    /// Snapshot of every session
    fn list(&self) -> Vec<Session>;

    /// Remove every session matching the predicate, returning their ids
    fn remove_where(&self, predicate: &mut dyn FnMut(&Session) -> bool) -> Vec<String>;

    /// Number of stored sessions
    fn len(&self) -> usize;
}

/// In-process session table
#[derive(Debug, Default)]
pub struct MemorySessionBackend {
    sessions: RwLock<HashMap<String, Session>>,
}

impl MemorySessionBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionBackend for MemorySessionBackend {
    fn get(&self, id: &str) -> Option<Session> {
        self.sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
            .cloned()
    }

    fn insert_if_absent(&self, session: Session) -> (Session, bool) {
        let mut sessions = self.sessions.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(existing) = sessions.get(&session.id) {
            return (existing.clone(), false);
        }
        sessions.insert(session.id.clone(), session.clone());
        (session, true)
    }

    fn update(&self, id: &str, apply: &mut dyn FnMut(&mut Session)) -> Option<Session> {
        let mut sessions = self.sessions.write().unwrap_or_else(PoisonError::into_inner);
        let session = sessions.get_mut(id)?;
        apply(session);
        Some(session.clone())
    }

    fn remove(&self, id: &str) -> Option<Session> {
        self.sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(id)
    }

    fn list(&self) -> Vec<Session> {
        self.sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .cloned()
            .collect()
    }

    fn remove_where(&self, predicate: &mut dyn FnMut(&Session) -> bool) -> Vec<String> {
        let mut sessions = self.sessions.write().unwrap_or_else(PoisonError::into_inner);
        let doomed: Vec<String> = sessions
            .values()
            .filter(|session| predicate(session))
            .map(|session| session.id.clone())
            .collect();
        for id in &doomed {
            sessions.remove(id);
        }
        doomed
    }

    fn len(&self) -> usize {
        self.sessions.read().unwrap_or_else(PoisonError::into_inner).len()
    }
}

/// Shared handle to the session table
///
/// Cloning is cheap; all clones see the same sessions.
#[derive(Clone)]
pub struct SessionStore {
    backend: Arc<dyn SessionBackend>,
}

impl SessionStore {
    /// Create a store backed by process memory
    pub fn new() -> Self {
        Self::with_backend(Arc::new(MemorySessionBackend::new()))
    }

    /// Create a store over a custom backend
    pub fn with_backend(backend: Arc<dyn SessionBackend>) -> Self {
        Self { backend }
    }

    /// Fetch a session, creating it if needed.
    ///
    /// With no id (or an empty one) a fresh UUID is minted. A known id is
    /// returned as-is apart from its activity timestamp.
    pub fn get_or_create(&self, id: Option<&str>, tool_name: &str) -> Session {
        match id.filter(|id| !id.is_empty()) {
            Some(id) => {
                if let Some(existing) = self.backend.update(id, &mut |s| s.touch()) {
                    return existing;
                }
                let (session, inserted) = self.backend.insert_if_absent(Session::new(id, tool_name));
                if inserted {
                    tracing::info!(
                        "[SessionStore] Created session {} for tool '{}'",
                        id,
                        tool_name
                    );
                }
                session
            }
            None => loop {
                let id = Uuid::new_v4().to_string();
                let (session, inserted) = self.backend.insert_if_absent(Session::new(&id, tool_name));
                if inserted {
                    tracing::info!(
                        "[SessionStore] Created session {} for tool '{}'",
                        id,
                        tool_name
                    );
                    return session;
                }
            },
        }
    }

    /// Fetch a session and refresh its activity timestamp
    pub fn get(&self, id: &str) -> Option<Session> {
        self.backend.update(id, &mut |s| s.touch())
    }

    /// Fetch a session without counting it as activity
    pub fn peek(&self, id: &str) -> Option<Session> {
        self.backend.get(id)
    }

    /// Snapshot of every live session
    pub fn list_active(&self) -> Vec<Session> {
        self.backend.list()
    }

    /// Remove a session; it is unreachable afterwards
    pub fn delete(&self, id: &str) -> Option<Session> {
        let removed = self.backend.remove(id);
        if removed.is_some() {
            tracing::info!("[SessionStore] Deleted session {}", id);
        }
        removed
    }

    /// Apply a whole-record mutation to one session
    pub fn update(&self, id: &str, mut apply: impl FnMut(&mut Session)) -> RelayResult<Session> {
        self.backend
            .update(id, &mut apply)
            .ok_or_else(|| RelayError::SessionNotFound(id.to_string()))
    }

    /// Evict every session idle longer than `idle_timeout` at `now`
    pub fn sweep_expired(&self, now: DateTime<Utc>, idle_timeout: Duration) -> Vec<String> {
        let idle_timeout =
            chrono::Duration::from_std(idle_timeout).unwrap_or_else(|_| chrono::Duration::weeks(5200));
        self.backend
            .remove_where(&mut |session| session.is_idle(now, idle_timeout))
    }

    pub fn len(&self) -> usize {
        self.backend.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("sessions", &self.len())
            .finish()
    }
}
