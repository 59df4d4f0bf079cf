//! Port for equipment persistence.

use async_trait::async_trait;

use crate::domain::{Equipment, EquipmentId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by equipment repository adapters.
    pub enum EquipmentRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "equipment repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "equipment repository query failed: {message}",
        /// Optimistic concurrency check failed.
        RevisionMismatch { expected: u32, actual: u32 } =>
            "equipment revision mismatch: expected {expected}, found {actual}",
    }
}

/// Port for equipment storage and retrieval.
///
/// Revision semantics mirror the ticket repository: the caller bumps
/// `equipment.revision` and passes the previous value as
/// `expected_revision`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EquipmentRepository: Send + Sync {
    /// Fetch equipment by id. Returns `None` when it does not exist.
    async fn find_by_id(
        &self,
        id: EquipmentId,
    ) -> Result<Option<Equipment>, EquipmentRepositoryError>;

    /// Persist an equipment mutation guarded by its revision.
    async fn save(
        &self,
        equipment: &Equipment,
        expected_revision: u32,
    ) -> Result<(), EquipmentRepositoryError>;
}

/// Fixture implementation for tests that do not exercise equipment
/// persistence.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureEquipmentRepository;

#[async_trait]
impl EquipmentRepository for FixtureEquipmentRepository {
    async fn find_by_id(
        &self,
        _id: EquipmentId,
    ) -> Result<Option<Equipment>, EquipmentRepositoryError> {
        Ok(None)
    }

    async fn save(
        &self,
        _equipment: &Equipment,
        _expected_revision: u32,
    ) -> Result<(), EquipmentRepositoryError> {
        Ok(())
    }
}
