//! Port for the user directory collaborator.
//!
//! The engine never manages users; it reads them to validate assignees and
//! to resolve notification recipients. Directory queries return only active
//! users.

use async_trait::async_trait;

use crate::domain::{DepartmentId, User, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by user directory adapters.
    pub enum UserDirectoryError {
        /// Directory connection could not be established.
        Connection { message: String } =>
            "user directory connection failed: {message}",
        /// Query failed during execution.
        Query { message: String } =>
            "user directory query failed: {message}",
    }
}

/// Port for user lookups and recipient resolution.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Fetch a user by id, active or not. Returns `None` when unknown.
    async fn find_user(&self, id: UserId) -> Result<Option<User>, UserDirectoryError>;

    /// Active users responsible for a department: its department heads plus
    /// managers (managers span departments, so adapters include them
    /// regardless of their own department row).
    async fn department_leads(
        &self,
        department_id: DepartmentId,
    ) -> Result<Vec<User>, UserDirectoryError>;

    /// Active operational staff across the facility: managers, department
    /// heads, and support.
    async fn operational_staff(&self) -> Result<Vec<User>, UserDirectoryError>;
}

/// Fixture implementation for tests that do not exercise the directory.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureUserDirectory;

#[async_trait]
impl UserDirectory for FixtureUserDirectory {
    async fn find_user(&self, _id: UserId) -> Result<Option<User>, UserDirectoryError> {
        Ok(None)
    }

    async fn department_leads(
        &self,
        _department_id: DepartmentId,
    ) -> Result<Vec<User>, UserDirectoryError> {
        Ok(Vec::new())
    }

    async fn operational_staff(&self) -> Result<Vec<User>, UserDirectoryError> {
        Ok(Vec::new())
    }
}
