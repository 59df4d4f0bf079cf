//! Port for maintenance schedule persistence and the overdue dedup
//! watermark.
//!
//! [`MaintenanceScheduleRepository::claim_overdue_notification`] is the one
//! place the engine requires a transactional compare-and-set: the due date
//! the sweep decided on must be the value the watermark is written against,
//! so a completion racing the sweep can never produce a notification for a
//! due date that was just cleared.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{MaintenanceSchedule, ScheduleId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by maintenance schedule repository adapters.
    pub enum MaintenanceScheduleRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "maintenance repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "maintenance repository query failed: {message}",
    }
}

/// Port for maintenance schedule storage, sweep reads, and dashboard counts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MaintenanceScheduleRepository: Send + Sync {
    /// Fetch a schedule by id. Returns `None` when it does not exist.
    async fn find_by_id(
        &self,
        id: ScheduleId,
    ) -> Result<Option<MaintenanceSchedule>, MaintenanceScheduleRepositoryError>;

    /// Insert a freshly created schedule.
    async fn insert(
        &self,
        schedule: &MaintenanceSchedule,
    ) -> Result<(), MaintenanceScheduleRepositoryError>;

    /// Persist a schedule mutation.
    async fn update(
        &self,
        schedule: &MaintenanceSchedule,
    ) -> Result<(), MaintenanceScheduleRepositoryError>;

    /// Active schedules whose due date lies strictly before `cutoff`.
    async fn list_active_due_before(
        &self,
        cutoff: DateTime<Utc>,
    ) -> Result<Vec<MaintenanceSchedule>, MaintenanceScheduleRepositoryError>;

    /// Atomically claim the overdue notification for `due_date`.
    ///
    /// Succeeds (returns `true`) only when the stored
    /// `next_maintenance_date` still equals `due_date` and the watermark is
    /// not already set to it; the adapter then records
    /// `overdue_notified_for = due_date` in the same transaction. Returns
    /// `false` when the episode was already notified or a concurrent
    /// completion moved the due date.
    async fn claim_overdue_notification(
        &self,
        id: ScheduleId,
        due_date: DateTime<Utc>,
    ) -> Result<bool, MaintenanceScheduleRepositoryError>;

    /// Number of active schedules.
    async fn count_active(&self) -> Result<u64, MaintenanceScheduleRepositoryError>;

    /// Number of active schedules due strictly before `cutoff`.
    async fn count_active_due_before(
        &self,
        cutoff: DateTime<Utc>,
    ) -> Result<u64, MaintenanceScheduleRepositoryError>;

    /// Number of active schedules due in `[from, to]`.
    async fn count_active_due_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<u64, MaintenanceScheduleRepositoryError>;
}

/// Fixture implementation for tests that do not exercise schedule
/// persistence. Lookups and listings are empty; claims never succeed.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureMaintenanceScheduleRepository;

#[async_trait]
impl MaintenanceScheduleRepository for FixtureMaintenanceScheduleRepository {
    async fn find_by_id(
        &self,
        _id: ScheduleId,
    ) -> Result<Option<MaintenanceSchedule>, MaintenanceScheduleRepositoryError> {
        Ok(None)
    }

    async fn insert(
        &self,
        _schedule: &MaintenanceSchedule,
    ) -> Result<(), MaintenanceScheduleRepositoryError> {
        Ok(())
    }

    async fn update(
        &self,
        _schedule: &MaintenanceSchedule,
    ) -> Result<(), MaintenanceScheduleRepositoryError> {
        Ok(())
    }

    async fn list_active_due_before(
        &self,
        _cutoff: DateTime<Utc>,
    ) -> Result<Vec<MaintenanceSchedule>, MaintenanceScheduleRepositoryError> {
        Ok(Vec::new())
    }

    async fn claim_overdue_notification(
        &self,
        _id: ScheduleId,
        _due_date: DateTime<Utc>,
    ) -> Result<bool, MaintenanceScheduleRepositoryError> {
        Ok(false)
    }

    async fn count_active(&self) -> Result<u64, MaintenanceScheduleRepositoryError> {
        Ok(0)
    }

    async fn count_active_due_before(
        &self,
        _cutoff: DateTime<Utc>,
    ) -> Result<u64, MaintenanceScheduleRepositoryError> {
        Ok(0)
    }

    async fn count_active_due_between(
        &self,
        _from: DateTime<Utc>,
        _to: DateTime<Utc>,
    ) -> Result<u64, MaintenanceScheduleRepositoryError> {
        Ok(0)
    }
}
