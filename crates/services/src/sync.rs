//! # Publish Status
//!
//! `idle → syncing → {success, error} → idle`. The return to `idle` is
//! driven by a timer so the admin sees the outcome for a moment; it is not a
//! retry.

use serde::Serialize;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

/// How long a terminal status stays visible before reverting to idle.
pub const DEFAULT_STATUS_RESET: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncStatus {
    #[default]
    Idle,
    Syncing,
    Success,
    Error,
}

impl fmt::Display for SyncStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SyncStatus::Idle => "idle",
            SyncStatus::Syncing => "syncing",
            SyncStatus::Success => "success",
            SyncStatus::Error => "error",
        })
    }
}

/// Owns the publish status and its auto-reset timer.
///
/// Each publish bumps a generation counter; a reset timer only fires if no
/// newer publish started in the meantime.
#[derive(Debug)]
pub struct SyncTracker {
    tx: Arc<watch::Sender<SyncStatus>>,
    generation: Arc<AtomicU64>,
    reset_after: Duration,
}

impl SyncTracker {
    pub fn new(reset_after: Duration) -> Self {
        let (tx, _rx) = watch::channel(SyncStatus::Idle);
        Self {
            tx: Arc::new(tx),
            generation: Arc::new(AtomicU64::new(0)),
            reset_after,
        }
    }

    pub fn status(&self) -> SyncStatus {
        *self.tx.borrow()
    }

    /// Observe every status change (UI badge, CLI progress line).
    pub fn subscribe(&self) -> watch::Receiver<SyncStatus> {
        self.tx.subscribe()
    }

    pub fn reset_after(&self) -> Duration {
        self.reset_after
    }

    pub(crate) fn begin(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.tx.send_replace(SyncStatus::Syncing);
    }

    /// Records the outcome and schedules the return to idle.
    ///
    /// Must be called from within a tokio runtime.
    pub(crate) fn finish(&self, outcome: SyncStatus) {
        let ticket = self.generation.load(Ordering::SeqCst);
        self.tx.send_replace(outcome);

        let tx = Arc::clone(&self.tx);
        let generation = Arc::clone(&self.generation);
        let delay = self.reset_after;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if generation.load(Ordering::SeqCst) == ticket {
                tx.send_replace(SyncStatus::Idle);
            }
        });
    }
}

impl Default for SyncTracker {
    fn default() -> Self {
        Self::new(DEFAULT_STATUS_RESET)
    }
}
