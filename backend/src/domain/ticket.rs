//! Ticket entity and status transition graph.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{Actor, Capability, DepartmentId, EquipmentId, TicketId, UserId};

/// Lifecycle states of a service ticket.
///
/// The graph is `Open → InProgress → Resolved → Closed` with exactly two
/// backward edges: `InProgress → Open` and `Resolved → InProgress`. `Closed`
/// is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketStatus {
    /// Reported, not yet picked up.
    Open,
    /// Being worked.
    InProgress,
    /// Work finished, pending closure.
    Resolved,
    /// Terminal.
    Closed,
}

impl TicketStatus {
    /// Whether the edge from `self` to `target` is in the transition graph.
    pub fn can_transition_to(self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Open, Self::InProgress)
                | (Self::InProgress, Self::Resolved)
                | (Self::Resolved, Self::Closed)
                | (Self::InProgress, Self::Open)
                | (Self::Resolved, Self::InProgress)
        )
    }

    /// Whether no edge leaves this status.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Closed)
    }

    /// Whether the work is finished: `Resolved` or `Closed`.
    pub fn is_settled(self) -> bool {
        matches!(self, Self::Resolved | Self::Closed)
    }
}

impl std::fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Open => "open",
            Self::InProgress => "in progress",
            Self::Resolved => "resolved",
            Self::Closed => "closed",
        };
        f.write_str(label)
    }
}

/// Urgency of a ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketPriority {
    Low,
    Medium,
    High,
    Critical,
}

impl Default for TicketPriority {
    fn default() -> Self {
        Self::Medium
    }
}

impl std::fmt::Display for TicketPriority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        };
        f.write_str(label)
    }
}

/// A service ticket raised against a piece of equipment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    /// Stable identifier.
    pub id: TicketId,
    /// The equipment this ticket services.
    pub equipment_id: EquipmentId,
    /// Current lifecycle state.
    pub status: TicketStatus,
    /// Urgency.
    pub priority: TicketPriority,
    /// The user who reported the problem. Fixed at creation; reassignment
    /// never changes it, and reporter-keyed visibility follows it.
    pub reporter_id: UserId,
    /// The user working the ticket, if any.
    pub assignee_id: Option<UserId>,
    /// Department the equipment belonged to when the ticket was opened.
    pub department_id: DepartmentId,
    /// Stamped on the first transition into `Resolved`; never changes after.
    pub completed_on: Option<DateTime<Utc>>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last mutation timestamp.
    pub updated_at: DateTime<Utc>,
    /// Optimistic-concurrency revision.
    pub revision: u32,
}

impl Ticket {
    /// Open a fresh ticket reported by `reporter_id`.
    pub fn open(
        id: TicketId,
        equipment_id: EquipmentId,
        department_id: DepartmentId,
        priority: TicketPriority,
        reporter_id: UserId,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            equipment_id,
            status: TicketStatus::Open,
            priority,
            reporter_id,
            assignee_id: None,
            department_id,
            completed_on: None,
            created_at: now,
            updated_at: now,
            revision: 1,
        }
    }

    /// Whether `user_id` is the current assignee.
    pub fn is_assigned_to(&self, user_id: UserId) -> bool {
        self.assignee_id == Some(user_id)
    }

    /// Whether `actor` may see this ticket.
    ///
    /// `ViewAllTickets` holders see everything. Department heads see their
    /// department's tickets. Support sees tickets it reported or works.
    /// Reporter-only roles see only tickets they reported, keyed on the
    /// original reporter regardless of any later reassignment.
    pub fn visible_to(&self, actor: &Actor) -> bool {
        if actor.role.has(Capability::ViewAllTickets) {
            return true;
        }
        if actor.role.is_reporter_only() {
            return self.reporter_id == actor.user_id;
        }
        if actor.role == crate::domain::Role::DepartmentHead {
            return actor.department_id == Some(self.department_id);
        }
        self.reporter_id == actor.user_id || self.is_assigned_to(actor.user_id)
    }
}
