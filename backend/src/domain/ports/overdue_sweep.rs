//! Driving port for the periodic overdue sweep.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::Error;

/// Outcome of one sweep run, for the scheduling collaborator's logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SweepReport {
    /// Active overdue schedules the sweep looked at.
    pub examined: usize,
    /// Schedules that produced a fresh overdue notification this run.
    pub notified: usize,
    /// Schedules skipped because of an individual failure.
    pub failed: usize,
}

/// Driving port invoked by the cron collaborator on a fixed interval.
///
/// The entry point is idempotent: re-running it without an intervening
/// completion emits nothing new, because each schedule's overdue episode is
/// claimed through the repository's watermark compare-and-set.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OverdueSweep: Send + Sync {
    /// Evaluate every active schedule against `now` and notify newly
    /// overdue ones.
    async fn run_overdue_sweep(&self, now: DateTime<Utc>) -> Result<SweepReport, Error>;
}
