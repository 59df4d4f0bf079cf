//! Driving port for a recipient's notification feed.

use async_trait::async_trait;
use pagination::{Page, PageRequest};

use crate::domain::{Error, Notification, NotificationId, UserId};

/// Request for one page of a recipient's notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotificationListRequest {
    /// Whose feed to read.
    pub recipient_id: UserId,
    /// Which page.
    pub page: PageRequest,
    /// Restrict to unread notifications.
    pub unread_only: bool,
}

/// Driving port for reading and mutating a recipient's own notifications.
///
/// Every operation is scoped to the calling recipient; ids belonging to
/// other users resolve as `NotFound`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationFeed: Send + Sync {
    /// One page of the recipient's notifications, newest first.
    async fn list(&self, request: NotificationListRequest) -> Result<Page<Notification>, Error>;

    /// Number of unread notifications, served through the badge cache.
    async fn unread_count(&self, recipient_id: UserId) -> Result<u64, Error>;

    /// Mark one notification read. Idempotent.
    async fn mark_read(
        &self,
        id: NotificationId,
        recipient_id: UserId,
    ) -> Result<Notification, Error>;

    /// Mark every unread notification read. Returns how many changed.
    async fn mark_all_read(&self, recipient_id: UserId) -> Result<u64, Error>;

    /// Delete one notification.
    async fn delete(&self, id: NotificationId, recipient_id: UserId) -> Result<(), Error>;
}
