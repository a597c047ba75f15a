//! In-memory session service
//!
//! Owns one [`SharedState`] per session key. Each state sits behind an async
//! mutex, so invocations against the same session run one at a time while
//! different sessions proceed independently.

use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::error::{Error, Result};
use crate::state::SharedState;

/// Handle to one session's state
pub type SessionHandle = Arc<Mutex<SharedState>>;

/// Process-local store of session states
#[derive(Debug, Default)]
pub struct SessionService {
    sessions: DashMap<String, SessionHandle>,
}

impl SessionService {
    /// Create an empty service
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a session with a fresh id
    pub fn create_session(&self) -> String {
        let id = uuid::Uuid::new_v4().to_string();
        self.sessions
            .insert(id.clone(), Arc::new(Mutex::new(SharedState::new())));
        tracing::debug!(session = %id, "Session created");
        id
    }

    /// Handle for an existing session
    pub fn get(&self, session_id: &str) -> Result<SessionHandle> {
        self.sessions
            .get(session_id)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| Error::SessionNotFound(session_id.to_string()))
    }

    /// Handle for `session_id`, creating the session if needed
    pub fn get_or_create(&self, session_id: &str) -> SessionHandle {
        self.sessions
            .entry(session_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(SharedState::new())))
            .value()
            .clone()
    }

    /// Copy of a session's current state
    pub async fn snapshot(&self, session_id: &str) -> Result<SharedState> {
        let handle = self.get(session_id)?;
        let state = handle.lock().await;
        Ok(state.clone())
    }

    /// Drop a session; returns whether it existed
    pub fn remove(&self, session_id: &str) -> bool {
        self.sessions.remove(session_id).is_some()
    }

    /// Number of live sessions
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// True when no session exists
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
