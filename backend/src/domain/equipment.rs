//! Equipment aggregate and downtime bookkeeping.
//!
//! Downtime state is derived purely from status transitions: entering
//! `OutOfService` opens an episode, leaving it closes the episode and folds
//! the elapsed whole minutes into the running total. The invariant
//! `is_currently_down == last_downtime_start.is_some()` holds across every
//! transition.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{DepartmentId, EquipmentId};

/// Operational status of a piece of equipment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EquipmentStatus {
    /// In service.
    Active,
    /// Down for repair; a downtime episode is open.
    OutOfService,
    /// Permanently withdrawn.
    Retired,
}

impl std::fmt::Display for EquipmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Active => "active",
            Self::OutOfService => "out of service",
            Self::Retired => "retired",
        };
        f.write_str(label)
    }
}

/// A tracked piece of equipment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Equipment {
    /// Stable identifier.
    pub id: EquipmentId,
    /// Current operational status.
    pub status: EquipmentStatus,
    /// Owning department, if assigned.
    pub department_id: Option<DepartmentId>,
    /// Number of resolved repair tickets. Monotonic.
    pub repair_count: u32,
    /// Whether a downtime episode is currently open.
    pub is_currently_down: bool,
    /// Start of the open downtime episode. `Some` iff `is_currently_down`.
    pub last_downtime_start: Option<DateTime<Utc>>,
    /// Accumulated downtime in whole minutes. Monotonic; grows only when a
    /// downtime episode closes.
    pub total_downtime_minutes: i64,
    /// Optimistic-concurrency revision.
    pub revision: u32,
}

impl Equipment {
    /// Build a fresh, active piece of equipment with no downtime history.
    pub fn new(id: EquipmentId, department_id: Option<DepartmentId>) -> Self {
        Self {
            id,
            status: EquipmentStatus::Active,
            department_id,
            repair_count: 0,
            is_currently_down: false,
            last_downtime_start: None,
            total_downtime_minutes: 0,
            revision: 1,
        }
    }

    /// Apply a status change, maintaining derived downtime state.
    ///
    /// Entering `OutOfService` opens a downtime episode (no-op when one is
    /// already open); leaving it closes the episode and accumulates the
    /// elapsed minutes. Every other transition touches the status only.
    pub fn apply_status_change(&mut self, new_status: EquipmentStatus, now: DateTime<Utc>) {
        match (self.status, new_status) {
            (EquipmentStatus::OutOfService, EquipmentStatus::Active | EquipmentStatus::Retired) => {
                self.close_downtime_episode(now);
            }
            (_, EquipmentStatus::OutOfService) => {
                if !self.is_currently_down {
                    self.is_currently_down = true;
                    self.last_downtime_start = Some(now);
                }
            }
            _ => {}
        }
        self.status = new_status;
    }

    fn close_downtime_episode(&mut self, now: DateTime<Utc>) {
        let Some(started) = self.last_downtime_start.take() else {
            self.is_currently_down = false;
            return;
        };
        let minutes = (now - started).num_minutes();
        if minutes < 0 {
            tracing::warn!(
                equipment = %self.id,
                started = %started,
                ended = %now,
                "downtime episode ended before it started; clamping to zero",
            );
        }
        self.total_downtime_minutes += minutes.max(0);
        self.is_currently_down = false;
    }
}
