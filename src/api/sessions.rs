//! In-memory conversation session store (non-persistent).
//!
//! Each session owns an independent `AgentExecutor` (and with it an
//! independent `ConversationState`) behind a `Mutex`, so one task at a time
//! works a given session while distinct sessions proceed independently.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use crate::agent::AgentExecutor;

/// A stored session: identity, creation time, and the executor owning its
/// conversation state.
pub struct Session {
    pub id: Uuid,
    pub created_at: String,
    pub executor: Mutex<AgentExecutor>,
}

#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<Uuid, Arc<Session>>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Create and register a session around a fresh executor.
    pub async fn create(&self, executor: AgentExecutor) -> Arc<Session> {
        let session = Arc::new(Session {
            id: Uuid::new_v4(),
            created_at: Utc::now().to_rfc3339(),
            executor: Mutex::new(executor),
        });
        self.sessions
            .write()
            .await
            .insert(session.id, session.clone());
        session
    }

    pub async fn get(&self, id: Uuid) -> Option<Arc<Session>> {
        self.sessions.read().await.get(&id).cloned()
    }

    /// All sessions, newest first.
    pub async fn list(&self) -> Vec<Arc<Session>> {
        let mut sessions: Vec<Arc<Session>> =
            self.sessions.read().await.values().cloned().collect();
        sessions.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        sessions
    }

    pub async fn remove(&self, id: Uuid) -> bool {
        self.sessions.write().await.remove(&id).is_some()
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{sample_records, PolicyStore};
    use crate::llm::testing::ScriptedLlm;
    use crate::llm::LlmClient;
    use crate::tools::ToolRegistry;

    fn executor() -> AgentExecutor {
        let store = Arc::new(PolicyStore::from_records(sample_records()));
        let llm: Arc<dyn LlmClient> = Arc::new(ScriptedLlm::new(Vec::<String>::new()));
        let tools = Arc::new(ToolRegistry::with_default_tools(store, llm.clone(), None));
        AgentExecutor::new(llm, tools, 5)
    }

    #[tokio::test]
    async fn create_then_get_returns_the_same_session() {
        let store = SessionStore::new();
        let created = store.create(executor()).await;

        let fetched = store.get(created.id).await.expect("session exists");
        assert_eq!(fetched.id, created.id);
    }

    #[tokio::test]
    async fn remove_deletes_the_session() {
        let store = SessionStore::new();
        let created = store.create(executor()).await;

        assert!(store.remove(created.id).await);
        assert!(store.get(created.id).await.is_none());
        assert!(!store.remove(created.id).await);
    }

    #[tokio::test]
    async fn sessions_are_independent() {
        let store = SessionStore::new();
        let first = store.create(executor()).await;
        let second = store.create(executor()).await;
        assert_ne!(first.id, second.id);
        assert_eq!(store.list().await.len(), 2);
    }
}
