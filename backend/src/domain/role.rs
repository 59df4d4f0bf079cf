//! Roles, capabilities, and the acting identity.
//!
//! The permission model is a single role-to-capability table plus a handful
//! of explicit vetoes applied by the services. There is no role hierarchy:
//! whether a role may do something is answered by [`Role::has`] and nothing
//! else, which keeps the policy enumerable and testable.

use serde::{Deserialize, Serialize};

use crate::domain::{DepartmentId, UserId};

/// The five roles known to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Full system access.
    OwnerAdmin,
    /// Runs operations across departments.
    Manager,
    /// Runs a single department.
    DepartmentHead,
    /// Technical staff working assigned tickets.
    Support,
    /// Department secretary; reports tickets, sees only its own.
    DepartmentLiaison,
}

/// Specialisation tag on support-role users. Informational only; never a
/// capability source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SupportType {
    BiomedTech,
    AirconTech,
    Plumber,
    Carpenter,
    Painter,
    Electrician,
    ItStaff,
    HouseKeeping,
    Other,
}

/// A named permission granted to a role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    /// May move any ticket into `Resolved`, not just assigned ones.
    TransitionToResolved,
    /// May move a resolved ticket into `Closed`.
    TransitionToClosed,
    /// May assign tickets to other users.
    AssignTicket,
    /// May mark maintenance schedules completed.
    CompleteMaintenance,
    /// May create maintenance schedules.
    CreateMaintenance,
    /// May see every ticket, not just own reports or assignments.
    ViewAllTickets,
    /// May change equipment status.
    UpdateEquipmentStatus,
}

const ALL_CAPABILITIES: &[Capability] = &[
    Capability::TransitionToResolved,
    Capability::TransitionToClosed,
    Capability::AssignTicket,
    Capability::CompleteMaintenance,
    Capability::CreateMaintenance,
    Capability::ViewAllTickets,
    Capability::UpdateEquipmentStatus,
];

const DEPARTMENT_HEAD_CAPABILITIES: &[Capability] = &[
    Capability::TransitionToResolved,
    Capability::AssignTicket,
    Capability::UpdateEquipmentStatus,
];

impl Role {
    /// Every role, for exhaustive policy enumeration.
    pub const ALL: [Self; 5] = [
        Self::OwnerAdmin,
        Self::Manager,
        Self::DepartmentHead,
        Self::Support,
        Self::DepartmentLiaison,
    ];

    /// The capability set this role holds. Pure and total.
    pub fn capabilities(self) -> &'static [Capability] {
        match self {
            Self::OwnerAdmin | Self::Manager => ALL_CAPABILITIES,
            Self::DepartmentHead => DEPARTMENT_HEAD_CAPABILITIES,
            Self::Support | Self::DepartmentLiaison => &[],
        }
    }

    /// Whether this role holds `capability`.
    pub fn has(self, capability: Capability) -> bool {
        self.capabilities().contains(&capability)
    }

    /// The reporter-only veto: such roles may report tickets but never work,
    /// resolve, close, or hold them, regardless of the capability table.
    pub fn is_reporter_only(self) -> bool {
        matches!(self, Self::DepartmentLiaison)
    }
}

/// Trusted per-request identity supplied by the session collaborator.
///
/// The engine performs no authentication; it takes the triple at face value
/// and applies the capability table and vetoes to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    /// The acting user.
    pub user_id: UserId,
    /// The acting user's role.
    pub role: Role,
    /// The acting user's department, if any.
    pub department_id: Option<DepartmentId>,
}

impl Actor {
    /// Whether this actor is the given user.
    pub fn is(&self, user_id: UserId) -> bool {
        self.user_id == user_id
    }
}
