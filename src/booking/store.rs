use chrono::{Duration, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

use super::session::BookingSession;
use super::BookingError;

/// In-process booking sessions, one per visitor.
#[derive(Clone, Default)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<Uuid, BookingSession>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn create(&self) -> BookingSession {
        let session = BookingSession::new(Uuid::new_v4());
        self.sessions.write().await.insert(session.id(), session.clone());
        info!(session = %session.id(), "booking session opened");
        session
    }

    /// Runs `f` against the session without changing it. Looking a session
    /// up still counts as activity, so this takes the write lock to mark it.
    pub async fn read<R>(
        &self,
        id: Uuid,
        f: impl FnOnce(&BookingSession) -> R,
    ) -> Result<R, BookingError> {
        let mut sessions = self.sessions.write().await;
        let session = sessions.get_mut(&id).ok_or(BookingError::SessionNotFound(id))?;
        session.touch();
        Ok(f(session))
    }

    /// Runs `f` with exclusive access to the session and marks it active.
    pub async fn update<R>(
        &self,
        id: Uuid,
        f: impl FnOnce(&mut BookingSession) -> R,
    ) -> Result<R, BookingError> {
        let mut sessions = self.sessions.write().await;
        let session = sessions.get_mut(&id).ok_or(BookingError::SessionNotFound(id))?;
        session.touch();
        Ok(f(session))
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }

    /// Drops sessions idle for longer than `max_idle`. Returns how many went.
    pub async fn purge_idle(&self, max_idle: Duration) -> usize {
        let cutoff = Utc::now() - max_idle;
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, session| session.last_active() >= cutoff);
        let purged = before - sessions.len();
        if purged > 0 {
            info!("purged {} idle booking sessions", purged);
        }
        purged
    }

    #[cfg(test)]
    pub(crate) async fn backdate(&self, id: Uuid, by: Duration) {
        if let Some(session) = self.sessions.write().await.get_mut(&id) {
            session.set_last_active(session.last_active() - by);
        }
    }
}
