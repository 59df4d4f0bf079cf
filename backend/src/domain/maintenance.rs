//! Maintenance schedule entity, recurrence, and due-date classification.

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{EquipmentId, ScheduleId, UserId};

/// Window ahead of the due date in which a schedule counts as due soon.
pub const DUE_SOON_WINDOW_DAYS: i64 = 7;

/// Wider look-ahead window reported by the dashboard stats.
pub const UPCOMING_WINDOW_DAYS: i64 = 30;

/// A recurring maintenance schedule for a piece of equipment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaintenanceSchedule {
    /// Stable identifier.
    pub id: ScheduleId,
    /// The equipment under maintenance. Must belong to a department at
    /// creation time.
    pub equipment_id: EquipmentId,
    /// Kind of work (preventive maintenance, calibration, inspection, ...).
    pub maintenance_type: String,
    /// Recurrence interval in days. Always positive.
    pub frequency_days: u32,
    /// When maintenance last happened, if ever.
    pub last_maintenance_date: Option<DateTime<Utc>>,
    /// When maintenance is next due.
    pub next_maintenance_date: DateTime<Utc>,
    /// The user responsible, if assigned.
    pub assignee_id: Option<UserId>,
    /// Inactive schedules are ignored by the sweep and classified as such.
    pub is_active: bool,
    /// Dedup watermark: the due date an overdue notification has already
    /// been emitted for. Cleared on completion.
    pub overdue_notified_for: Option<DateTime<Utc>>,
}

/// Read-only classification of a schedule against a point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaintenanceStanding {
    /// The due date has passed.
    Overdue,
    /// Due within [`DUE_SOON_WINDOW_DAYS`].
    DueSoon,
    /// Due later than the due-soon window.
    Scheduled,
    /// The schedule is switched off.
    Inactive,
}

/// Dashboard aggregates over active schedules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaintenanceStats {
    /// Number of active schedules.
    pub total_active: u64,
    /// Active schedules past their due date.
    pub overdue: u64,
    /// Active schedules due within seven days.
    pub due_within_7_days: u64,
    /// Active schedules due within thirty days.
    pub due_within_30_days: u64,
}

impl MaintenanceSchedule {
    /// Build an active schedule with its first due date.
    pub fn new(
        id: ScheduleId,
        equipment_id: EquipmentId,
        maintenance_type: String,
        frequency_days: u32,
        first_due: DateTime<Utc>,
        assignee_id: Option<UserId>,
    ) -> Self {
        Self {
            id,
            equipment_id,
            maintenance_type,
            frequency_days,
            last_maintenance_date: None,
            next_maintenance_date: first_due,
            assignee_id,
            is_active: true,
            overdue_notified_for: None,
        }
    }

    /// Classify this schedule against `now`.
    pub fn classify(&self, now: DateTime<Utc>) -> MaintenanceStanding {
        if !self.is_active {
            return MaintenanceStanding::Inactive;
        }
        if self.next_maintenance_date < now {
            return MaintenanceStanding::Overdue;
        }
        if self.next_maintenance_date <= now + TimeDelta::days(DUE_SOON_WINDOW_DAYS) {
            return MaintenanceStanding::DueSoon;
        }
        MaintenanceStanding::Scheduled
    }

    /// Record a completed maintenance pass and roll the due date forward.
    ///
    /// Clears the overdue watermark so the next missed due date produces a
    /// fresh notification.
    pub fn complete(&mut self, now: DateTime<Utc>) {
        self.last_maintenance_date = Some(now);
        self.next_maintenance_date = now + TimeDelta::days(i64::from(self.frequency_days));
        self.overdue_notified_for = None;
    }
}
