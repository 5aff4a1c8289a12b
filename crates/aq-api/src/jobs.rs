//! Background jobs for periodic maintenance.
//!
//! Expired sessions are already dropped when looked up; the sweep catches
//! the ones nobody comes back for.

use std::time::Duration;

use chrono::Utc;
use tokio::time::interval;

use crate::{metrics, session::SessionStore};

/// Start all background jobs
///
/// Returns the join handles so they can be aborted on shutdown
pub fn start_background_jobs(
    sessions: SessionStore,
    sweep_every: Duration,
) -> Vec<tokio::task::JoinHandle<()>> {
    vec![tokio::spawn(periodic_session_sweep_job(
        sessions,
        sweep_every,
    ))]
}

async fn periodic_session_sweep_job(sessions: SessionStore, sweep_every: Duration) {
    let mut interval = interval(sweep_every);
    // the first tick completes immediately
    interval.tick().await;

    loop {
        interval.tick().await;
        sweep_sessions(&sessions).await;
    }
}

/// Drop expired sessions and refresh the active session gauge.
pub async fn sweep_sessions(sessions: &SessionStore) -> usize {
    let purged = sessions.purge_expired(Utc::now()).await;
    let remaining = sessions.len().await;
    metrics::set_active_sessions(remaining);

    if purged > 0 {
        tracing::info!(purged, remaining, "Expired quiz sessions removed");
    } else {
        tracing::debug!(remaining, "Session sweep complete: nothing expired");
    }

    purged
}
