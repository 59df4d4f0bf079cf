//! Notification entity and per-recipient read state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{EquipmentId, NotificationId, ScheduleId, TicketId, UserId};

/// Category of a notification, mirroring the event that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    TicketOpened,
    TicketAssigned,
    TicketStatusChanged,
    EquipmentStatusChanged,
    MaintenanceCompleted,
    MaintenanceOverdue,
}

/// Kind of entity a notification points back at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelatedEntityKind {
    Ticket,
    Equipment,
    Maintenance,
}

/// Reference from a notification to the entity it concerns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelatedEntity {
    /// What kind of entity the id refers to.
    pub kind: RelatedEntityKind,
    /// The referenced entity's id.
    pub id: Uuid,
}

impl RelatedEntity {
    /// Reference a ticket.
    pub fn ticket(id: TicketId) -> Self {
        Self {
            kind: RelatedEntityKind::Ticket,
            id: *id.as_uuid(),
        }
    }

    /// Reference a piece of equipment.
    pub fn equipment(id: EquipmentId) -> Self {
        Self {
            kind: RelatedEntityKind::Equipment,
            id: *id.as_uuid(),
        }
    }

    /// Reference a maintenance schedule.
    pub fn maintenance(id: ScheduleId) -> Self {
        Self {
            kind: RelatedEntityKind::Maintenance,
            id: *id.as_uuid(),
        }
    }
}

/// Payload for a notification about to be created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewNotification {
    /// Who receives it.
    pub recipient_id: UserId,
    /// Short headline.
    pub title: String,
    /// Body text.
    pub message: String,
    /// Category.
    pub kind: NotificationKind,
    /// Optional back-reference to the entity it concerns.
    pub related: Option<RelatedEntity>,
}

/// A notification owned by its recipient.
///
/// Created by the dispatcher in response to a domain event; afterwards only
/// the recipient's read/delete actions mutate it. `read_at` is `Some` iff
/// `is_read`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    /// Stable identifier.
    pub id: NotificationId,
    /// Owning recipient.
    pub recipient_id: UserId,
    /// Short headline.
    pub title: String,
    /// Body text.
    pub message: String,
    /// Category.
    pub kind: NotificationKind,
    /// Optional back-reference to the entity it concerns.
    pub related: Option<RelatedEntity>,
    /// Whether the recipient has read it.
    pub is_read: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// When the recipient read it. `Some` iff `is_read`.
    pub read_at: Option<DateTime<Utc>>,
}

impl Notification {
    /// Materialise a [`NewNotification`] into an unread row.
    pub fn create(draft: NewNotification, now: DateTime<Utc>) -> Self {
        Self {
            id: NotificationId::random(),
            recipient_id: draft.recipient_id,
            title: draft.title,
            message: draft.message,
            kind: draft.kind,
            related: draft.related,
            is_read: false,
            created_at: now,
            read_at: None,
        }
    }

    /// Mark read. Idempotent: a second call keeps the first `read_at`.
    pub fn mark_read(&mut self, now: DateTime<Utc>) {
        if !self.is_read {
            self.is_read = true;
            self.read_at = Some(now);
        }
    }
}
