use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::{access::AccessSession, errors::AppResult};

/// Storage for [`AccessSession`]s, keyed by the session id from the token.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Returns an empty session for ids never saved or already expired.
    async fn load(&self, session_id: &str) -> AppResult<AccessSession>;
    /// Keeps `session` until `expires_at`, normally the token expiry.
    async fn save(
        &self,
        session_id: &str,
        session: AccessSession,
        expires_at: DateTime<Utc>,
    ) -> AppResult<()>;
}

struct StoredSession {
    session: AccessSession,
    expires_at: DateTime<Utc>,
}

/// Process-local sessions. Lost on restart, which only means users re-enter
/// quiz passwords. Expired entries are pruned on every save.
#[derive(Default)]
pub struct InMemorySessionRepository {
    sessions: Arc<RwLock<HashMap<String, StoredSession>>>,
}

impl InMemorySessionRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionRepository for InMemorySessionRepository {
    async fn load(&self, session_id: &str) -> AppResult<AccessSession> {
        let sessions = self.sessions.read().await;
        let session = sessions
            .get(session_id)
            .filter(|stored| stored.expires_at > Utc::now())
            .map(|stored| stored.session.clone())
            .unwrap_or_default();
        Ok(session)
    }

    async fn save(
        &self,
        session_id: &str,
        session: AccessSession,
        expires_at: DateTime<Utc>,
    ) -> AppResult<()> {
        let now = Utc::now();
        let mut sessions = self.sessions.write().await;

        let before = sessions.len();
        sessions.retain(|_, stored| stored.expires_at > now);
        if sessions.len() < before {
            log::debug!("Pruned {} expired access session(s)", before - sessions.len());
        }

        if session == AccessSession::default() || expires_at <= now {
            sessions.remove(session_id);
        } else {
            sessions.insert(
                session_id.to_string(),
                StoredSession {
                    session,
                    expires_at,
                },
            );
        }
        Ok(())
    }
}
