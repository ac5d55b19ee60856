use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard};

use crate::types::ThinkingSession;

/// Process-lifetime registry of thinking sessions.
///
/// Cloning yields another handle to the same sessions. Entries are created
/// lazily by the tracker and are never removed or expired.
#[derive(Clone, Default)]
pub struct SessionStore {
    inner: Arc<Mutex<HashMap<String, ThinkingSession>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Exclusive access for one read-check-mutate sequence
    pub(crate) async fn lock(&self) -> MutexGuard<'_, HashMap<String, ThinkingSession>> {
        self.inner.lock().await
    }

    /// Copy of the session's current state
    pub async fn snapshot(&self, session_id: &str) -> Option<ThinkingSession> {
        self.inner.lock().await.get(session_id).cloned()
    }

    pub async fn contains(&self, session_id: &str) -> bool {
        self.inner.lock().await.contains_key(session_id)
    }

    pub async fn len(&self) -> usize {
        self.inner.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.lock().await.is_empty()
    }

    /// Known session ids, sorted
    pub async fn session_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.inner.lock().await.keys().cloned().collect();
        ids.sort_unstable();
        ids
    }
}
