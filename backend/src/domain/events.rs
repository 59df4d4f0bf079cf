//! Domain events raised by state changes.
//!
//! Events carry full entity snapshots so the dispatcher can compose
//! notification text without further lookups. The emitting service resolves
//! anything the snapshot cannot answer (such as the equipment's department
//! for maintenance events) before raising the event.

use serde::{Deserialize, Serialize};

use crate::domain::{
    Actor, DepartmentId, Equipment, EquipmentStatus, MaintenanceSchedule, Ticket, TicketStatus,
    UserId,
};

/// A state change observed by the engine, fanned out by the dispatcher.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DomainEvent {
    /// A ticket was reported.
    TicketOpened {
        /// The freshly created ticket.
        ticket: Ticket,
        /// Who reported it.
        actor: Actor,
    },
    /// A ticket was assigned to a user.
    TicketAssigned {
        /// The ticket after assignment.
        ticket: Ticket,
        /// The new assignee.
        assignee_id: UserId,
        /// Who performed the assignment.
        actor: Actor,
    },
    /// A ticket moved along the status graph.
    TicketStatusChanged {
        /// The ticket after the transition.
        ticket: Ticket,
        /// Status before the transition.
        old_status: TicketStatus,
        /// Status after the transition.
        new_status: TicketStatus,
        /// Who performed the transition.
        actor: Actor,
    },
    /// Equipment changed operational status.
    EquipmentStatusChanged {
        /// The equipment after the change.
        equipment: Equipment,
        /// Status before the change.
        old_status: EquipmentStatus,
        /// Status after the change.
        new_status: EquipmentStatus,
        /// Who performed the change.
        actor: Actor,
    },
    /// A maintenance pass was completed.
    MaintenanceCompleted {
        /// The schedule after its due date rolled forward.
        schedule: MaintenanceSchedule,
        /// Department of the schedule's equipment, for recipient fallback.
        department_id: Option<DepartmentId>,
        /// Who completed the maintenance.
        actor: Actor,
    },
    /// The sweep found a schedule past its due date.
    MaintenanceOverdue {
        /// The overdue schedule.
        schedule: MaintenanceSchedule,
        /// Department of the schedule's equipment, for recipient fallback.
        department_id: Option<DepartmentId>,
    },
}
