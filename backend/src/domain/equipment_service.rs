//! Equipment status domain service.
//!
//! Status changes are the driver of downtime accounting outside ticket
//! resolution: moving equipment out of service opens a downtime episode,
//! returning it to service closes the episode and accumulates the elapsed
//! minutes.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;

use crate::domain::ports::{
    EquipmentRepository, EquipmentRepositoryError, EquipmentStatusCommand, NotificationDispatch,
};
use crate::domain::{Actor, Capability, DomainEvent, Equipment, EquipmentId, EquipmentStatus, Error};

fn map_repository_error(error: EquipmentRepositoryError) -> Error {
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

/// Equipment status service implementing the [`EquipmentStatusCommand`]
/// driving port.
pub struct EquipmentStatusService<E> {
    equipment_repo: Arc<E>,
    dispatcher: Arc<dyn NotificationDispatch>,
    clock: Arc<dyn Clock>,
}

impl<E> EquipmentStatusService<E> {
    /// Create a new service over the given collaborators.
    pub fn new(
        equipment_repo: Arc<E>,
        dispatcher: Arc<dyn NotificationDispatch>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            equipment_repo,
            dispatcher,
            clock,
        }
    }
}

#[async_trait]
impl<E> EquipmentStatusCommand for EquipmentStatusService<E>
where
    E: EquipmentRepository,
{
    async fn update_status(
        &self,
        equipment_id: EquipmentId,
        new_status: EquipmentStatus,
        actor: Actor,
    ) -> Result<Equipment, Error> {
        if !actor.role.has(Capability::UpdateEquipmentStatus) {
            return Err(Error::forbidden(
                "changing equipment status requires the equipment capability",
            ));
        }

        let mut equipment = self
            .equipment_repo
            .find_by_id(equipment_id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| Error::not_found(format!("equipment {equipment_id} not found")))?;

        if equipment.status == new_status {
            return Err(Error::invalid_request(format!(
                "equipment is already {new_status}",
            )));
        }

        let now = self.clock.utc();
        let old_status = equipment.status;
        let expected_revision = equipment.revision;
        equipment.apply_status_change(new_status, now);
        equipment.revision = expected_revision + 1;

        self.equipment_repo
            .save(&equipment, expected_revision)
            .await
            .map_err(map_repository_error)?;

        if let Err(error) = self
            .dispatcher
            .dispatch(DomainEvent::EquipmentStatusChanged {
                equipment: equipment.clone(),
                old_status,
                new_status,
                actor,
            })
            .await
        {
            tracing::warn!(
                %error,
                equipment = %equipment.id,
                "notification dispatch failed after equipment status change",
            );
        }

        Ok(equipment)
    }
}

#[cfg(test)]
#[path = "equipment_service_tests.rs"]
mod tests;
