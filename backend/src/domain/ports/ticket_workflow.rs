//! Driving port for ticket workflow operations.
//!
//! Inbound adapters call this port to report, transition, and assign
//! tickets. The implementation applies the capability table and role vetoes
//! before touching state.

use async_trait::async_trait;

use crate::domain::{Actor, Error, EquipmentId, Ticket, TicketId, TicketPriority, TicketStatus, UserId};

/// Request to report a new ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpenTicketRequest {
    /// The equipment the problem concerns.
    pub equipment_id: EquipmentId,
    /// Urgency of the report.
    pub priority: TicketPriority,
    /// Who is reporting. Becomes the ticket's reporter.
    pub actor: Actor,
}

/// Driving port for the ticket state machine.
///
/// # Errors
///
/// All operations return the domain taxonomy: `NotFound` for unresolved
/// ids, `InvalidTransition` for edges outside the graph, `Forbidden` for
/// capability or veto failures, and `Conflict` when a concurrent mutation
/// wins the race (the caller retries against fresh state).
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TicketWorkflow: Send + Sync {
    /// Report a new ticket against a piece of equipment.
    async fn open_ticket(&self, request: OpenTicketRequest) -> Result<Ticket, Error>;

    /// Move a ticket along the status graph as `actor`.
    async fn transition(
        &self,
        ticket_id: TicketId,
        target: TicketStatus,
        actor: Actor,
    ) -> Result<Ticket, Error>;

    /// Assign a ticket to `assignee_id` as `actor`.
    async fn assign(
        &self,
        ticket_id: TicketId,
        assignee_id: UserId,
        actor: Actor,
    ) -> Result<Ticket, Error>;
}
