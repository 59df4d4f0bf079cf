//! Notification dispatcher and per-recipient feed.
//!
//! [`NotificationService`] sits on both sides of the engine: it implements
//! [`NotificationDispatch`] for the state-changing services (event in,
//! independent per-recipient rows out) and [`NotificationFeed`] for the
//! recipient-facing read/mutate operations. Unread counts are served through
//! the badge cache, which every unread-changing write invalidates before
//! returning.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use pagination::Page;

use crate::domain::ports::{
    NotificationDispatch, NotificationFeed, NotificationListRequest, NotificationRepository,
    NotificationRepositoryError, UnreadBadgeCache, UserDirectory, UserDirectoryError,
};
use crate::domain::{
    DepartmentId, DomainEvent, Error, MaintenanceSchedule, NewNotification, Notification,
    NotificationId, NotificationKind, RelatedEntity, UserId,
};

fn map_repo_error(error: NotificationRepositoryError) -> Error {
    match error {
        NotificationRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("notification repository unavailable: {message}"))
        }
        NotificationRepositoryError::Query { message } => {
            Error::internal(format!("notification repository error: {message}"))
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

/// Accumulates drafts while keeping each recipient to one row per event.
#[derive(Default)]
struct DraftBatch {
    drafts: Vec<NewNotification>,
}

impl DraftBatch {
    fn push(
        &mut self,
        recipient_id: UserId,
        title: &str,
        message: String,
        kind: NotificationKind,
        related: RelatedEntity,
    ) {
        if self.drafts.iter().any(|d| d.recipient_id == recipient_id) {
            return;
        }
        self.drafts.push(NewNotification {
            recipient_id,
            title: title.to_owned(),
            message,
            kind,
            related: Some(related),
        });
    }
}

/// Notification service implementing the [`NotificationDispatch`] and
/// [`NotificationFeed`] driving ports.
pub struct NotificationService<N, U, C> {
    notification_repo: Arc<N>,
    directory: Arc<U>,
    cache: Arc<C>,
    clock: Arc<dyn Clock>,
}

impl<N, U, C> NotificationService<N, U, C> {
    /// Create a new service over the given collaborators.
    pub fn new(
        notification_repo: Arc<N>,
        directory: Arc<U>,
        cache: Arc<C>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            notification_repo,
            directory,
            cache,
            clock,
        }
    }
}

impl<N, U, C> NotificationService<N, U, C>
where
    N: NotificationRepository,
    U: UserDirectory,
    C: UnreadBadgeCache,
{
    /// Drop the recipient's cached badge. Soft failure: a stale badge is
    /// bounded by the client's poll interval, so a cache error must not fail
    /// the write that already happened.
    async fn invalidate_badge(&self, recipient_id: UserId) {
        if let Err(error) = self.cache.invalidate(recipient_id).await {
            tracing::warn!(
                %error,
                recipient = %recipient_id,
                "unread badge invalidation failed; badge may lag until the next poll",
            );
        }
    }

    /// Recipients for a maintenance event: the schedule's assignee when it
    /// is active and not the actor, otherwise the department's leads. A
    /// self-completion is suppressed rather than escalated.
    async fn maintenance_recipients(
        &self,
        schedule: &MaintenanceSchedule,
        department_id: Option<DepartmentId>,
        exclude: Option<UserId>,
    ) -> Result<Vec<UserId>, Error> {
        if let Some(assignee_id) = schedule.assignee_id {
            if exclude == Some(assignee_id) {
                return Ok(Vec::new());
            }
            let assignee = self
                .directory
                .find_user(assignee_id)
                .await
                .map_err(map_directory_error)?;
            if assignee.is_some_and(|user| user.is_active) {
                return Ok(vec![assignee_id]);
            }
        }
        let Some(department_id) = department_id else {
            return Ok(Vec::new());
        };
        let leads = self
            .directory
            .department_leads(department_id)
            .await
            .map_err(map_directory_error)?;
        Ok(leads
            .into_iter()
            .map(|user| user.id)
            .filter(|id| exclude != Some(*id))
            .collect())
    }

    async fn drafts_for(&self, event: &DomainEvent) -> Result<Vec<NewNotification>, Error> {
        let mut batch = DraftBatch::default();
        match event {
            DomainEvent::TicketOpened { ticket, actor } => {
                let staff = self
                    .directory
                    .operational_staff()
                    .await
                    .map_err(map_directory_error)?;
                for user in staff {
                    if actor.is(user.id) {
                        continue;
                    }
                    batch.push(
                        user.id,
                        "New Ticket Created",
                        format!("New {} priority ticket reported", ticket.priority),
                        NotificationKind::TicketOpened,
                        RelatedEntity::ticket(ticket.id),
                    );
                }
            }
            DomainEvent::TicketAssigned {
                ticket,
                assignee_id,
                actor,
            } => {
                if !actor.is(*assignee_id) {
                    batch.push(
                        *assignee_id,
                        "Ticket Assigned to You",
                        format!(
                            "You have been assigned to a {} priority ticket",
                            ticket.priority,
                        ),
                        NotificationKind::TicketAssigned,
                        RelatedEntity::ticket(ticket.id),
                    );
                }
            }
            DomainEvent::TicketStatusChanged {
                ticket,
                old_status,
                new_status,
                actor,
            } => {
                if !actor.is(ticket.reporter_id) {
                    batch.push(
                        ticket.reporter_id,
                        "Ticket Status Updated",
                        format!("Your ticket moved from {old_status} to {new_status}"),
                        NotificationKind::TicketStatusChanged,
                        RelatedEntity::ticket(ticket.id),
                    );
                }
                if let Some(assignee_id) = ticket.assignee_id {
                    if !actor.is(assignee_id) && new_status.is_settled() {
                        batch.push(
                            assignee_id,
                            "Ticket Status Updated",
                            format!("A ticket assigned to you was marked {new_status}"),
                            NotificationKind::TicketStatusChanged,
                            RelatedEntity::ticket(ticket.id),
                        );
                    }
                }
            }
            DomainEvent::EquipmentStatusChanged {
                equipment,
                old_status,
                new_status,
                actor,
            } => {
                let Some(department_id) = equipment.department_id else {
                    return Ok(Vec::new());
                };
                let leads = self
                    .directory
                    .department_leads(department_id)
                    .await
                    .map_err(map_directory_error)?;
                for user in leads {
                    if actor.is(user.id) {
                        continue;
                    }
                    batch.push(
                        user.id,
                        "Equipment Status Changed",
                        format!("Equipment status changed from {old_status} to {new_status}"),
                        NotificationKind::EquipmentStatusChanged,
                        RelatedEntity::equipment(equipment.id),
                    );
                }
            }
            DomainEvent::MaintenanceCompleted {
                schedule,
                department_id,
                actor,
            } => {
                let recipients = self
                    .maintenance_recipients(schedule, *department_id, Some(actor.user_id))
                    .await?;
                for recipient_id in recipients {
                    batch.push(
                        recipient_id,
                        "Maintenance Completed",
                        format!("{} has been completed", schedule.maintenance_type),
                        NotificationKind::MaintenanceCompleted,
                        RelatedEntity::maintenance(schedule.id),
                    );
                }
            }
            DomainEvent::MaintenanceOverdue {
                schedule,
                department_id,
            } => {
                let recipients = self
                    .maintenance_recipients(schedule, *department_id, None)
                    .await?;
                let days_overdue = (self.clock.utc() - schedule.next_maintenance_date)
                    .num_days()
                    .max(0);
                for recipient_id in recipients {
                    batch.push(
                        recipient_id,
                        "Maintenance Overdue",
                        format!(
                            "{} is overdue by {days_overdue} days",
                            schedule.maintenance_type,
                        ),
                        NotificationKind::MaintenanceOverdue,
                        RelatedEntity::maintenance(schedule.id),
                    );
                }
            }
        }
        Ok(batch.drafts)
    }
}

#[async_trait]
impl<N, U, C> NotificationDispatch for NotificationService<N, U, C>
where
    N: NotificationRepository,
    U: UserDirectory,
    C: UnreadBadgeCache,
{
    async fn dispatch(&self, event: DomainEvent) -> Result<Vec<Notification>, Error> {
        let drafts = self.drafts_for(&event).await?;
        if drafts.is_empty() {
            return Ok(Vec::new());
        }

        let now = self.clock.utc();
        let notifications: Vec<Notification> = drafts
            .into_iter()
            .map(|draft| Notification::create(draft, now))
            .collect();
        self.notification_repo
            .insert_batch(&notifications)
            .await
            .map_err(map_repo_error)?;

        for notification in &notifications {
            self.invalidate_badge(notification.recipient_id).await;
        }
        Ok(notifications)
    }
}

#[async_trait]
impl<N, U, C> NotificationFeed for NotificationService<N, U, C>
where
    N: NotificationRepository,
    U: UserDirectory,
    C: UnreadBadgeCache,
{
    async fn list(&self, request: NotificationListRequest) -> Result<Page<Notification>, Error> {
        let (items, total) = self
            .notification_repo
            .list_for_recipient(request.recipient_id, &request.page, request.unread_only)
            .await
            .map_err(map_repo_error)?;
        Ok(Page::assemble(items, total, &request.page))
    }

    async fn unread_count(&self, recipient_id: UserId) -> Result<u64, Error> {
        match self.cache.get(recipient_id).await {
            Ok(Some(count)) => return Ok(count),
            Ok(None) => {}
            Err(error) => {
                tracing::warn!(
                    %error,
                    recipient = %recipient_id,
                    "unread badge read failed; falling back to the repository",
                );
            }
        }

        let count = self
            .notification_repo
            .unread_count(recipient_id)
            .await
            .map_err(map_repo_error)?;
        if let Err(error) = self.cache.put(recipient_id, count).await {
            tracing::warn!(
                %error,
                recipient = %recipient_id,
                "unread badge refresh failed",
            );
        }
        Ok(count)
    }

    async fn mark_read(
        &self,
        id: NotificationId,
        recipient_id: UserId,
    ) -> Result<Notification, Error> {
        let mut notification = self
            .notification_repo
            .find_for_recipient(id, recipient_id)
            .await
            .map_err(map_repo_error)?
            .ok_or_else(|| Error::not_found(format!("notification {id} not found")))?;

        if notification.is_read {
            return Ok(notification);
        }

        notification.mark_read(self.clock.utc());
        self.notification_repo
            .update(&notification)
            .await
            .map_err(map_repo_error)?;
        self.invalidate_badge(recipient_id).await;
        Ok(notification)
    }

    async fn mark_all_read(&self, recipient_id: UserId) -> Result<u64, Error> {
        let changed = self
            .notification_repo
            .mark_all_read(recipient_id, self.clock.utc())
            .await
            .map_err(map_repo_error)?;
        if changed > 0 {
            self.invalidate_badge(recipient_id).await;
        }
        Ok(changed)
    }

    async fn delete(&self, id: NotificationId, recipient_id: UserId) -> Result<(), Error> {
        let removed = self
            .notification_repo
            .delete(id, recipient_id)
            .await
            .map_err(map_repo_error)?;
        if !removed {
            return Err(Error::not_found(format!("notification {id} not found")));
        }
        self.invalidate_badge(recipient_id).await;
        Ok(())
    }
}

#[cfg(test)]
#[path = "notification_service_tests.rs"]
mod tests;
