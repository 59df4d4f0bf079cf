//! Driving port for equipment status changes.

use async_trait::async_trait;

use crate::domain::{Actor, Equipment, EquipmentId, EquipmentStatus, Error};

/// Driving port for changing equipment operational status.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EquipmentStatusCommand: Send + Sync {
    /// Change the status of a piece of equipment as `actor`.
    ///
    /// Requires the `UpdateEquipmentStatus` capability. Downtime episodes
    /// open and close as a side effect of the transition; the equipment's
    /// department leads are notified of the change.
    async fn update_status(
        &self,
        equipment_id: EquipmentId,
        new_status: EquipmentStatus,
        actor: Actor,
    ) -> Result<Equipment, Error>;
}
