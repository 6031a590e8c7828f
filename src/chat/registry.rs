//! Session registry
//!
//! Maps caller-supplied session identifiers to live chat sessions. The map
//! is the only structure shared across concurrent callers; it sits behind
//! one mutex held only for the duration of a map operation, never across a
//! network call. Sessions live until process shutdown; there is no
//! individual deletion.

use crate::chat::model::Model;
use crate::chat::session::ChatSession;
use crate::config::Settings;
use crate::Result;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use uuid::Uuid;

/// Registry of live sessions keyed by opaque identifier
#[derive(Debug)]
pub struct SessionRegistry {
    settings: Arc<Settings>,
    sessions: Mutex<HashMap<String, Arc<ChatSession>>>,
}

impl SessionRegistry {
    /// Create an empty registry
    pub fn new(settings: Arc<Settings>) -> Self {
        Self {
            settings,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    /// Look up a session, creating it when the identifier is unknown or
    /// absent.
    ///
    /// Returns the (possibly generated) identifier together with the
    /// session. A model given for an existing session switches that
    /// session's model. Creation acquires the initial token over the
    /// network, which happens outside the registry lock; when two callers
    /// race on the same new identifier the first inserted session wins.
    pub async fn get_or_create(
        &self,
        session_id: Option<&str>,
        model: Option<Model>,
    ) -> Result<(String, Arc<ChatSession>)> {
        if let Some(id) = session_id {
            let existing = self.lock().get(id).cloned();
            if let Some(session) = existing {
                if let Some(model) = model {
                    session.set_model(model).await;
                }
                return Ok((id.to_string(), session));
            }
        }

        let id = session_id
            .map(str::to_string)
            .unwrap_or_else(generate_session_id);
        let session = Arc::new(
            ChatSession::create(model.unwrap_or_default(), self.settings.clone()).await?,
        );

        let session = self
            .lock()
            .entry(id.clone())
            .or_insert(session)
            .clone();

        Ok((id, session))
    }

    /// Look up an existing session
    pub fn get(&self, session_id: &str) -> Option<Arc<ChatSession>> {
        self.lock().get(session_id).cloned()
    }

    /// Number of live sessions
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether no session exists yet
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Arc<ChatSession>>> {
        // The lock is only held for map operations; recover from a
        // poisoned lock rather than propagating a panic.
        self.sessions.lock().unwrap_or_else(|e| e.into_inner())
    }
}

fn generate_session_id() -> String {
    format!("session_{}", Uuid::new_v4().simple())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_ids_are_unique_and_prefixed() {
        let a = generate_session_id();
        let b = generate_session_id();
        assert!(a.starts_with("session_"));
        assert_ne!(a, b);
    }

    #[test]
    fn test_registry_starts_empty() {
        let registry = SessionRegistry::new(Arc::new(Settings::default()));
        assert!(registry.is_empty());
        assert_eq!(registry.len(), 0);
        assert!(registry.get("session_missing").is_none());
    }
}
