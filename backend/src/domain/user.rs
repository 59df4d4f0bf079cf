//! User data model.

use serde::{Deserialize, Serialize};

use crate::domain::{Actor, DepartmentId, Role, SupportType, UserId};

/// A user known to the directory collaborator.
///
/// The engine never creates or edits users; it reads them for recipient
/// resolution and assignment validation. `department_id` is `None` only for
/// owner-admins, who sit above any single department.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Stable identifier.
    pub id: UserId,
    /// The user's role.
    pub role: Role,
    /// Specialisation tag for support staff.
    pub support_type: Option<SupportType>,
    /// Home department, if any.
    pub department_id: Option<DepartmentId>,
    /// Inactive users receive no notifications and hold no assignments.
    pub is_active: bool,
}

impl User {
    /// Build an active user with no support specialisation.
    pub fn new(id: UserId, role: Role, department_id: Option<DepartmentId>) -> Self {
        Self {
            id,
            role,
            support_type: None,
            department_id,
            is_active: true,
        }
    }

    /// The identity triple this user presents to the engine.
    pub fn actor(&self) -> Actor {
        Actor {
            user_id: self.id,
            role: self.role,
            department_id: self.department_id,
        }
    }
}
