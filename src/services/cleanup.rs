use chrono::Duration as ChronoDuration;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::AppState;

/// Drops booking sessions nobody has touched for a while.
pub struct CleanupService {
    state: Arc<AppState>,
}

impl CleanupService {
    pub fn new(state: Arc<AppState>) -> Self {
        Self { state }
    }

    /// Runs one sweep and reports what happened.
    pub async fn run_once(&self) -> CleanupStats {
        let minutes = self.state.config.sessions.idle_timeout_minutes;
        let Some(max_idle) = ChronoDuration::try_minutes(minutes).filter(|d| *d > ChronoDuration::zero())
        else {
            warn!("🧹 Idle timeout of {} minutes is out of range, skipping sweep", minutes);
            return CleanupStats {
                purged_sessions: 0,
                active_sessions: self.state.sessions.len().await,
            };
        };
        let purged_sessions = self.state.sessions.purge_idle(max_idle).await;
        let active_sessions = self.state.sessions.len().await;

        if purged_sessions == 0 {
            debug!("🧹 No idle booking sessions to clean up");
        } else {
            info!(
                "🧹 Removed {} idle booking sessions, {} still active",
                purged_sessions, active_sessions
            );
        }

        CleanupStats {
            purged_sessions,
            active_sessions,
        }
    }

    /// Sweeps on the configured interval until the task is dropped.
    pub async fn run_forever(self) {
        let every = Duration::from_secs(self.state.config.sessions.cleanup_interval_seconds.max(1));
        let mut ticker = tokio::time::interval(every);
        loop {
            ticker.tick().await;
            self.run_once().await;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CleanupStats {
    pub purged_sessions: usize,
    pub active_sessions: usize,
}
