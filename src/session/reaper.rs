//! Idle session reaper
//!
//! Sweeps the store on a fixed interval and evicts sessions that have been
//! idle past the timeout. This is memory hygiene only: a session read just
//! before a sweep stays valid for that access even if already past the
//! timeout.

use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use super::store::SessionStore;
use crate::config::RelayConfig;

/// Periodic eviction of idle sessions
#[derive(Debug, Clone)]
pub struct SessionReaper {
    store: SessionStore,
    interval: Duration,
    idle_timeout: Duration,
}

impl SessionReaper {
    pub fn new(store: SessionStore, interval: Duration, idle_timeout: Duration) -> Self {
        Self {
            store,
            interval,
            idle_timeout,
        }
    }

    /// Create a reaper using the configured interval and idle timeout
    pub fn from_config(store: SessionStore, config: &RelayConfig) -> Self {
        Self::new(store, config.sweep_interval(), config.session_idle_timeout())
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn idle_timeout(&self) -> Duration {
        self.idle_timeout
    }

    /// Run one sweep against the current time
    pub fn sweep(&self) -> Vec<String> {
        self.sweep_at(Utc::now())
    }

    /// Run one sweep as if the time were `now`
    pub fn sweep_at(&self, now: DateTime<Utc>) -> Vec<String> {
        let evicted = self.store.sweep_expired(now, self.idle_timeout);

        for id in &evicted {
            tracing::info!("[SessionReaper] Evicted expired session {}", id);
        }
        if evicted.is_empty() {
            tracing::trace!("[SessionReaper] No expired sessions");
        } else {
            tracing::debug!(
                "[SessionReaper] Evicted {} sessions, {} remaining",
                evicted.len(),
                self.store.len()
            );
        }

        evicted
    }

    /// Start sweeping on the tokio runtime until `cancel` fires
    pub fn spawn(self, cancel: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(self.run(cancel))
    }

    /// Sweep loop. The first sweep happens one interval after start.
    pub async fn run(self, cancel: CancellationToken) {
        tracing::info!(
            "[SessionReaper] Sweeping every {:?}, idle timeout {:?}",
            self.interval,
            self.idle_timeout
        );

        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick fires immediately.
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.sweep();
                }
                _ = cancel.cancelled() => break,
            }
        }

        tracing::info!("[SessionReaper] Stopped");
    }
}
