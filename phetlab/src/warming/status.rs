//! Shared status of a warming pass.

use std::sync::Arc;

use parking_lot::Mutex;
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Authoritative progress of one warming pass.
///
/// Updated by the workers as tasks finish.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WarmStatus {
    /// Tasks scheduled (laboratories × languages).
    pub total: usize,
    pub completed: usize,
    pub failed: usize,
    /// Tasks never started because the pass was cancelled.
    pub cancelled: usize,
    pub is_complete: bool,
    pub was_cancelled: bool,
    /// Set when the pass could not start (catalog unavailable).
    pub error: Option<String>,
}

impl WarmStatus {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            ..Self::default()
        }
    }

    /// Tasks accounted for so far.
    pub fn processed(&self) -> usize {
        self.completed + self.failed + self.cancelled
    }

    /// Progress as a fraction from 0.0 to 1.0.
    pub fn progress_fraction(&self) -> f64 {
        if self.total == 0 {
            return 1.0;
        }
        self.processed() as f64 / self.total as f64
    }

    pub fn report(&self) -> WarmReport {
        WarmReport {
            total: self.total,
            completed: self.completed,
            failed: self.failed,
            cancelled: self.cancelled,
            was_cancelled: self.was_cancelled,
        }
    }
}

/// Final accounting of a finished pass.
///
/// `completed + failed + cancelled == total` always holds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct WarmReport {
    pub total: usize,
    pub completed: usize,
    pub failed: usize,
    pub cancelled: usize,
    pub was_cancelled: bool,
}

/// Handle to a running warming pass.
///
/// Cheap to clone. Cancellation is cooperative: tasks already running
/// finish, queued tasks are dropped.
#[derive(Clone)]
pub struct WarmHandle {
    pub(crate) status: Arc<Mutex<WarmStatus>>,
    pub(crate) cancellation: CancellationToken,
}

impl WarmHandle {
    /// Snapshot of the current status.
    pub fn status(&self) -> WarmStatus {
        self.status.lock().clone()
    }

    pub fn cancel(&self) {
        info!("Warming cancellation requested");
        self.cancellation.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancellation.is_cancelled()
    }

    pub fn is_complete(&self) -> bool {
        self.status.lock().is_complete
    }
}
