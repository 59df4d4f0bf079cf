//! Ticket workflow domain service.
//!
//! Implements the ticket state machine: capability and veto checks, the
//! repair-count and downtime side effects of resolution, and event emission.
//! Ticket and equipment mutations commit through a single repository call so
//! side effects can never half-apply, and every commit is guarded by the
//! ticket's revision so concurrent transitions serialise.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;

use crate::domain::ports::{
    EquipmentRepository, EquipmentRepositoryError, NotificationDispatch, OpenTicketRequest,
    TicketRepository, TicketRepositoryError, TicketWorkflow, UserDirectory, UserDirectoryError,
};
use crate::domain::{
    Actor, Capability, DomainEvent, Equipment, EquipmentStatus, Error, Ticket, TicketId,
    TicketStatus, UserId,
};

fn map_ticket_repo_error(error: TicketRepositoryError) -> Error {
    match error {
        TicketRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("ticket repository unavailable: {message}"))
        }
        TicketRepositoryError::Query { message } => {
            Error::internal(format!("ticket repository error: {message}"))
        }
        TicketRepositoryError::RevisionMismatch { .. } => {
            Error::conflict("ticket was modified concurrently; retry with fresh state")
        }
    }
}

fn map_equipment_repo_error(error: EquipmentRepositoryError) -> Error {
    match error {
        EquipmentRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("equipment repository unavailable: {message}"))
        }
        EquipmentRepositoryError::Query { message } => {
            Error::internal(format!("equipment repository error: {message}"))
        }
        EquipmentRepositoryError::RevisionMismatch { .. } => {
            Error::conflict("equipment was modified concurrently; retry with fresh state")
        }
    }
}

fn map_directory_error(error: UserDirectoryError) -> Error {
    match error {
        UserDirectoryError::Connection { message } => {
            Error::service_unavailable(format!("user directory unavailable: {message}"))
        }
        UserDirectoryError::Query { message } => {
            Error::internal(format!("user directory error: {message}"))
        }
    }
}

/// Ticket workflow service implementing the [`TicketWorkflow`] driving port.
pub struct TicketWorkflowService<T, E, U> {
    ticket_repo: Arc<T>,
    equipment_repo: Arc<E>,
    directory: Arc<U>,
    dispatcher: Arc<dyn NotificationDispatch>,
    clock: Arc<dyn Clock>,
}

impl<T, E, U> TicketWorkflowService<T, E, U> {
    /// Create a new service over the given collaborators.
    pub fn new(
        ticket_repo: Arc<T>,
        equipment_repo: Arc<E>,
        directory: Arc<U>,
        dispatcher: Arc<dyn NotificationDispatch>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            ticket_repo,
            equipment_repo,
            directory,
            dispatcher,
            clock,
        }
    }
}

impl<T, E, U> TicketWorkflowService<T, E, U>
where
    T: TicketRepository,
    E: EquipmentRepository,
    U: UserDirectory,
{
    async fn load_ticket(&self, ticket_id: TicketId) -> Result<Ticket, Error> {
        self.ticket_repo
            .find_by_id(ticket_id)
            .await
            .map_err(map_ticket_repo_error)?
            .ok_or_else(|| Error::not_found(format!("ticket {ticket_id} not found")))
    }

    /// The capability and veto layer for a single edge.
    ///
    /// The reporter-only veto runs first: such roles never work tickets, no
    /// matter what the capability table would say. Reaching `Closed` always
    /// demands the closing capability; reaching `Resolved` is open to the
    /// assignee and to resolution-capability or view-all holders; the
    /// working edges between `Open` and `InProgress` (and reopening from
    /// `Resolved`) are open to the assignee and to users who could see or
    /// assign the ticket anyway.
    fn authorize_transition(
        ticket: &Ticket,
        target: TicketStatus,
        actor: &Actor,
    ) -> Result<(), Error> {
        if actor.role.is_reporter_only() {
            return Err(Error::forbidden(
                "reporter-only roles may not change ticket status",
            ));
        }
        let assigned = ticket.is_assigned_to(actor.user_id);
        let allowed = match target {
            TicketStatus::Closed => actor.role.has(Capability::TransitionToClosed),
            TicketStatus::Resolved => {
                assigned
                    || actor.role.has(Capability::TransitionToResolved)
                    || actor.role.has(Capability::ViewAllTickets)
            }
            TicketStatus::Open | TicketStatus::InProgress => {
                assigned
                    || actor.role.has(Capability::ViewAllTickets)
                    || actor.role.has(Capability::AssignTicket)
            }
        };
        if allowed {
            Ok(())
        } else {
            Err(Error::forbidden(format!(
                "role is not permitted to move this ticket to {target}",
            )))
        }
    }

    /// Apply the equipment side effects of entering `Resolved`.
    ///
    /// Every traversal of the edge counts one repair. An open downtime
    /// episode is closed by returning the equipment to service.
    async fn resolve_side_effects(
        &self,
        ticket: &Ticket,
        now: chrono::DateTime<chrono::Utc>,
    ) -> Result<Equipment, Error> {
        let mut equipment = self
            .equipment_repo
            .find_by_id(ticket.equipment_id)
            .await
            .map_err(map_equipment_repo_error)?
            .ok_or_else(|| {
                Error::internal(format!(
                    "ticket {} references missing equipment {}",
                    ticket.id, ticket.equipment_id,
                ))
            })?;
        equipment.repair_count += 1;
        if equipment.is_currently_down {
            equipment.apply_status_change(EquipmentStatus::Active, now);
        }
        equipment.revision += 1;
        Ok(equipment)
    }

    async fn emit(&self, event: DomainEvent, ticket_id: TicketId) {
        if let Err(error) = self.dispatcher.dispatch(event).await {
            tracing::warn!(
                %error,
                ticket = %ticket_id,
                "notification dispatch failed after ticket commit",
            );
        }
    }
}

#[async_trait]
impl<T, E, U> TicketWorkflow for TicketWorkflowService<T, E, U>
where
    T: TicketRepository,
    E: EquipmentRepository,
    U: UserDirectory,
{
    async fn open_ticket(&self, request: OpenTicketRequest) -> Result<Ticket, Error> {
        let equipment = self
            .equipment_repo
            .find_by_id(request.equipment_id)
            .await
            .map_err(map_equipment_repo_error)?
            .ok_or_else(|| {
                Error::not_found(format!("equipment {} not found", request.equipment_id))
            })?;
        let department_id = equipment.department_id.ok_or_else(|| {
            Error::invalid_request(
                "equipment must be assigned to a department before tickets can be reported",
            )
        })?;

        let ticket = Ticket::open(
            TicketId::random(),
            equipment.id,
            department_id,
            request.priority,
            request.actor.user_id,
            self.clock.utc(),
        );
        self.ticket_repo
            .insert(&ticket)
            .await
            .map_err(map_ticket_repo_error)?;

        self.emit(
            DomainEvent::TicketOpened {
                ticket: ticket.clone(),
                actor: request.actor,
            },
            ticket.id,
        )
        .await;
        Ok(ticket)
    }

    async fn transition(
        &self,
        ticket_id: TicketId,
        target: TicketStatus,
        actor: Actor,
    ) -> Result<Ticket, Error> {
        let mut ticket = self.load_ticket(ticket_id).await?;

        if ticket.status.is_terminal() {
            return Err(Error::invalid_transition(format!(
                "ticket {ticket_id} is closed; no further transitions are possible",
            )));
        }
        if !ticket.status.can_transition_to(target) {
            return Err(Error::invalid_transition(format!(
                "cannot move a ticket from {} to {target}",
                ticket.status,
            )));
        }
        Self::authorize_transition(&ticket, target, &actor)?;

        let now = self.clock.utc();
        let old_status = ticket.status;
        let expected_revision = ticket.revision;

        let equipment_update = if target == TicketStatus::Resolved {
            let equipment = self.resolve_side_effects(&ticket, now).await?;
            if ticket.completed_on.is_none() {
                ticket.completed_on = Some(now);
            }
            Some(equipment)
        } else {
            None
        };

        ticket.status = target;
        ticket.updated_at = now;
        ticket.revision = expected_revision + 1;

        self.ticket_repo
            .commit(&ticket, equipment_update, expected_revision)
            .await
            .map_err(map_ticket_repo_error)?;

        self.emit(
            DomainEvent::TicketStatusChanged {
                ticket: ticket.clone(),
                old_status,
                new_status: target,
                actor,
            },
            ticket.id,
        )
        .await;
        Ok(ticket)
    }

    async fn assign(
        &self,
        ticket_id: TicketId,
        assignee_id: UserId,
        actor: Actor,
    ) -> Result<Ticket, Error> {
        if actor.is(assignee_id) {
            if actor.role.is_reporter_only() {
                return Err(Error::forbidden(
                    "reporter-only roles may not hold ticket assignments",
                ));
            }
        } else if !actor.role.has(Capability::AssignTicket) {
            return Err(Error::forbidden(
                "assigning tickets to others requires the assignment capability",
            ));
        }

        let assignee = self
            .directory
            .find_user(assignee_id)
            .await
            .map_err(map_directory_error)?
            .ok_or_else(|| Error::not_found(format!("assignee {assignee_id} not found")))?;
        if !assignee.is_active {
            return Err(Error::invalid_request(
                "tickets cannot be assigned to inactive users",
            ));
        }
        if assignee.role.is_reporter_only() {
            return Err(Error::invalid_request(
                "tickets cannot be assigned to reporter-only roles",
            ));
        }

        let mut ticket = self.load_ticket(ticket_id).await?;
        if ticket.status.is_terminal() {
            return Err(Error::invalid_request(
                "closed tickets cannot be reassigned",
            ));
        }
        let expected_revision = ticket.revision;
        ticket.assignee_id = Some(assignee_id);
        ticket.updated_at = self.clock.utc();
        ticket.revision = expected_revision + 1;

        self.ticket_repo
            .commit(&ticket, None, expected_revision)
            .await
            .map_err(map_ticket_repo_error)?;

        self.emit(
            DomainEvent::TicketAssigned {
                ticket: ticket.clone(),
                assignee_id,
                actor,
            },
            ticket.id,
        )
        .await;
        Ok(ticket)
    }
}

#[cfg(test)]
#[path = "ticket_service_tests.rs"]
mod tests;
