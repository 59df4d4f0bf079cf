//! Port for ticket persistence.
//!
//! The central contract is [`TicketRepository::commit`]: a ticket mutation
//! and any equipment side effects (repair count, downtime accumulation) land
//! in a single transactional write guarded by the ticket's revision. A retry
//! after a lost race re-reads the ticket and re-derives the side effects, so
//! nothing double-applies.

use async_trait::async_trait;

use crate::domain::{Equipment, Ticket, TicketId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by ticket repository adapters.
    pub enum TicketRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "ticket repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "ticket repository query failed: {message}",
        /// Optimistic concurrency check failed.
        RevisionMismatch { expected: u32, actual: u32 } =>
            "ticket revision mismatch: expected {expected}, found {actual}",
    }
}

/// Port for ticket storage and retrieval.
///
/// # Revision Semantics
///
/// - New tickets are inserted at revision 1.
/// - The caller bumps `ticket.revision` before committing; `commit` succeeds
///   only if the stored revision still equals `expected_revision`, otherwise
///   it returns [`TicketRepositoryError::RevisionMismatch`]. Two concurrent
///   transitions on one ticket therefore cannot both succeed.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TicketRepository: Send + Sync {
    /// Fetch a ticket by id. Returns `None` when it does not exist.
    async fn find_by_id(&self, id: TicketId) -> Result<Option<Ticket>, TicketRepositoryError>;

    /// Insert a freshly opened ticket.
    async fn insert(&self, ticket: &Ticket) -> Result<(), TicketRepositoryError>;

    /// Persist a ticket mutation, atomically with any equipment update.
    ///
    /// When `equipment` is `Some`, the adapter must write both rows in one
    /// transaction: either the transition and its repair-count/downtime
    /// effects all land, or none do.
    async fn commit(
        &self,
        ticket: &Ticket,
        equipment: Option<Equipment>,
        expected_revision: u32,
    ) -> Result<(), TicketRepositoryError>;
}

/// Fixture implementation for tests that do not exercise ticket persistence.
///
/// Lookups return `None` and writes are discarded.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureTicketRepository;

#[async_trait]
impl TicketRepository for FixtureTicketRepository {
    async fn find_by_id(&self, _id: TicketId) -> Result<Option<Ticket>, TicketRepositoryError> {
        Ok(None)
    }

    async fn insert(&self, _ticket: &Ticket) -> Result<(), TicketRepositoryError> {
        Ok(())
    }

    async fn commit(
        &self,
        _ticket: &Ticket,
        _equipment: Option<Equipment>,
        _expected_revision: u32,
    ) -> Result<(), TicketRepositoryError> {
        Ok(())
    }
}
