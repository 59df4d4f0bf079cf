//! Port for notification persistence.
//!
//! Every read and mutation is scoped to a recipient: a notification owned by
//! someone else is indistinguishable from a missing one, which is how the
//! engine enforces per-recipient ownership without a separate check.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use pagination::PageRequest;

use crate::domain::{Notification, NotificationId, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by notification repository adapters.
    pub enum NotificationRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "notification repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "notification repository query failed: {message}",
    }
}

/// Port for notification storage, listing, and read-state mutations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationRepository: Send + Sync {
    /// Insert a batch of freshly created notifications.
    async fn insert_batch(
        &self,
        notifications: &[Notification],
    ) -> Result<(), NotificationRepositoryError>;

    /// Fetch a notification by id, scoped to its recipient.
    async fn find_for_recipient(
        &self,
        id: NotificationId,
        recipient_id: UserId,
    ) -> Result<Option<Notification>, NotificationRepositoryError>;

    /// Persist a read-state mutation.
    async fn update(&self, notification: &Notification)
    -> Result<(), NotificationRepositoryError>;

    /// Mark every unread notification of `recipient_id` read at `read_at`.
    /// Returns how many rows changed.
    async fn mark_all_read(
        &self,
        recipient_id: UserId,
        read_at: DateTime<Utc>,
    ) -> Result<u64, NotificationRepositoryError>;

    /// Delete a notification scoped to its recipient. Returns whether a row
    /// was removed.
    async fn delete(
        &self,
        id: NotificationId,
        recipient_id: UserId,
    ) -> Result<bool, NotificationRepositoryError>;

    /// Number of unread notifications for `recipient_id`.
    async fn unread_count(&self, recipient_id: UserId)
    -> Result<u64, NotificationRepositoryError>;

    /// One page of a recipient's notifications, newest first, plus the total
    /// matching count.
    async fn list_for_recipient(
        &self,
        recipient_id: UserId,
        request: &PageRequest,
        unread_only: bool,
    ) -> Result<(Vec<Notification>, u64), NotificationRepositoryError>;
}

/// Fixture implementation for tests that do not exercise notification
/// persistence.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureNotificationRepository;

#[async_trait]
impl NotificationRepository for FixtureNotificationRepository {
    async fn insert_batch(
        &self,
        _notifications: &[Notification],
    ) -> Result<(), NotificationRepositoryError> {
        Ok(())
    }

    async fn find_for_recipient(
        &self,
        _id: NotificationId,
        _recipient_id: UserId,
    ) -> Result<Option<Notification>, NotificationRepositoryError> {
        Ok(None)
    }

    async fn update(
        &self,
        _notification: &Notification,
    ) -> Result<(), NotificationRepositoryError> {
        Ok(())
    }

    async fn mark_all_read(
        &self,
        _recipient_id: UserId,
        _read_at: DateTime<Utc>,
    ) -> Result<u64, NotificationRepositoryError> {
        Ok(0)
    }

    async fn delete(
        &self,
        _id: NotificationId,
        _recipient_id: UserId,
    ) -> Result<bool, NotificationRepositoryError> {
        Ok(false)
    }

    async fn unread_count(
        &self,
        _recipient_id: UserId,
    ) -> Result<u64, NotificationRepositoryError> {
        Ok(0)
    }

    async fn list_for_recipient(
        &self,
        _recipient_id: UserId,
        _request: &PageRequest,
        _unread_only: bool,
    ) -> Result<(Vec<Notification>, u64), NotificationRepositoryError> {
        Ok((Vec::new(), 0))
    }
}
