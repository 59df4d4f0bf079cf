//! Driving ports for maintenance schedule operations and dashboard reads.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{
    Actor, EquipmentId, Error, MaintenanceSchedule, MaintenanceStats, ScheduleId, UserId,
};

/// Request to create a maintenance schedule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleDraft {
    /// The equipment to maintain. Must belong to a department.
    pub equipment_id: EquipmentId,
    /// Kind of work (preventive maintenance, calibration, ...).
    pub maintenance_type: String,
    /// Recurrence interval in days. Must be positive.
    pub frequency_days: u32,
    /// When the first pass is due.
    pub first_due: DateTime<Utc>,
    /// The user responsible, if known.
    pub assignee_id: Option<UserId>,
}

/// Driving port for creating and completing maintenance schedules.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MaintenancePlanning: Send + Sync {
    /// Create a schedule. Requires the `CreateMaintenance` capability.
    async fn create_schedule(
        &self,
        draft: ScheduleDraft,
        actor: Actor,
    ) -> Result<MaintenanceSchedule, Error>;

    /// Record a completed pass and roll the due date forward. Requires the
    /// `CompleteMaintenance` capability.
    async fn complete(&self, schedule_id: ScheduleId, actor: Actor)
    -> Result<MaintenanceSchedule, Error>;
}

/// Read-only driving port for dashboard aggregates.
///
/// Rendering collaborators call this; it never mutates state and never
/// emits events.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MaintenanceQuery: Send + Sync {
    /// Aggregate counts over active schedules at `now`.
    async fn stats(&self, now: DateTime<Utc>) -> Result<MaintenanceStats, Error>;
}
