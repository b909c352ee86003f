use super::state::SessionState;
use std::collections::HashMap;
use std::sync::RwLock;

/// Session persistence contract. The coordinator only needs load/save/remove;
/// swapping in a persistent backend never touches dispatch logic.
pub trait SessionStore: Send + Sync {
    fn load(&self, id: &str) -> Option<SessionState>;

    fn save(&self, session: SessionState);

    fn remove(&self, id: &str) -> bool;

    fn ids(&self) -> Vec<String>;

    /// Create-if-absent semantics shared by every backend.
    fn load_or_create(&self, id: &str) -> SessionState {
        self.load(id).unwrap_or_else(|| SessionState::new(id))
    }
}

/// Process-lifetime in-memory backend.
#[derive(Default)]
pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<String, SessionState>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for InMemorySessionStore {
    fn load(&self, id: &str) -> Option<SessionState> {
        self.sessions
            .read()
            .expect("session lock poisoned")
            .get(id)
            .cloned()
    }

    fn save(&self, session: SessionState) {
        self.sessions
            .write()
            .expect("session lock poisoned")
            .insert(session.id.clone(), session);
    }

    fn remove(&self, id: &str) -> bool {
        self.sessions
            .write()
            .expect("session lock poisoned")
            .remove(id)
            .is_some()
    }

    fn ids(&self) -> Vec<String> {
        self.sessions
            .read()
            .expect("session lock poisoned")
            .keys()
            .cloned()
            .collect()
    }
}
