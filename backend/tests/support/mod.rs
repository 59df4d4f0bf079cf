//! Stateful in-memory doubles for the workflow scenario suite.
//!
//! Unlike the mockall doubles used beside the services, these keep real
//! state behind a mutex so a scenario can drive several services against one
//! shared world and assert on what actually persisted.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Local, TimeDelta, Utc};
use mockable::Clock;
use pagination::PageRequest;

use backend::domain::ports::{
    EquipmentRepository, EquipmentRepositoryError, MaintenanceScheduleRepository,
    MaintenanceScheduleRepositoryError, NotificationRepository, NotificationRepositoryError,
    TicketRepository, TicketRepositoryError, UnreadBadgeCache, UnreadBadgeCacheError,
    UserDirectory, UserDirectoryError,
};
use backend::domain::{
    DepartmentId, Equipment, EquipmentId, MaintenanceSchedule, Notification, NotificationId, Role,
    ScheduleId, Ticket, TicketId, User, UserId,
};

/// Clock whose current instant tests advance explicitly.
pub struct MutableClock(Mutex<DateTime<Utc>>);

impl MutableClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self(Mutex::new(now))
    }

    pub fn advance(&self, delta: TimeDelta) {
        *self.0.lock().expect("clock lock") += delta;
    }
}

impl Clock for MutableClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.0.lock().expect("clock lock")
    }
}

/// Equipment store with the revision check adapters must implement.
#[derive(Default)]
pub struct InMemoryEquipmentRepository {
    rows: Mutex<HashMap<EquipmentId, Equipment>>,
}

impl InMemoryEquipmentRepository {
    pub fn seed(&self, equipment: Equipment) {
        self.rows
            .lock()
            .expect("equipment lock")
            .insert(equipment.id, equipment);
    }

    pub fn get(&self, id: EquipmentId) -> Equipment {
        self.rows
            .lock()
            .expect("equipment lock")
            .get(&id)
            .cloned()
            .expect("seeded equipment")
    }

    fn store_checked(
        &self,
        equipment: &Equipment,
        expected_revision: u32,
    ) -> Result<(), EquipmentRepositoryError> {
        let mut rows = self.rows.lock().expect("equipment lock");
        let stored = rows
            .get(&equipment.id)
            .ok_or_else(|| EquipmentRepositoryError::query("equipment row missing"))?;
        if stored.revision != expected_revision {
            return Err(EquipmentRepositoryError::revision_mismatch(
                expected_revision,
                stored.revision,
            ));
        }
        rows.insert(equipment.id, equipment.clone());
        Ok(())
    }
}

#[async_trait]
impl EquipmentRepository for InMemoryEquipmentRepository {
    async fn find_by_id(
        &self,
        id: EquipmentId,
    ) -> Result<Option<Equipment>, EquipmentRepositoryError> {
        Ok(self.rows.lock().expect("equipment lock").get(&id).cloned())
    }

    async fn save(
        &self,
        equipment: &Equipment,
        expected_revision: u32,
    ) -> Result<(), EquipmentRepositoryError> {
        self.store_checked(equipment, expected_revision)
    }
}

/// Ticket store whose `commit` writes the ticket and any equipment side
/// effects against one world, mirroring the single-transaction contract.
pub struct InMemoryTicketRepository {
    rows: Mutex<HashMap<TicketId, Ticket>>,
    equipment: Arc<InMemoryEquipmentRepository>,
}

impl InMemoryTicketRepository {
    pub fn new(equipment: Arc<InMemoryEquipmentRepository>) -> Self {
        Self {
            rows: Mutex::new(HashMap::new()),
            equipment,
        }
    }
}

#[async_trait]
impl TicketRepository for InMemoryTicketRepository {
    async fn find_by_id(&self, id: TicketId) -> Result<Option<Ticket>, TicketRepositoryError> {
        Ok(self.rows.lock().expect("ticket lock").get(&id).cloned())
    }

    async fn insert(&self, ticket: &Ticket) -> Result<(), TicketRepositoryError> {
        self.rows
            .lock()
            .expect("ticket lock")
            .insert(ticket.id, ticket.clone());
        Ok(())
    }

    async fn commit(
        &self,
        ticket: &Ticket,
        equipment: Option<Equipment>,
        expected_revision: u32,
    ) -> Result<(), TicketRepositoryError> {
        let mut rows = self.rows.lock().expect("ticket lock");
        let stored = rows
            .get(&ticket.id)
            .ok_or_else(|| TicketRepositoryError::query("ticket row missing"))?;
        if stored.revision != expected_revision {
            return Err(TicketRepositoryError::revision_mismatch(
                expected_revision,
                stored.revision,
            ));
        }
        if let Some(equipment) = equipment {
            let expected = equipment.revision - 1;
            self.equipment
                .store_checked(&equipment, expected)
                .map_err(|error| TicketRepositoryError::query(error.to_string()))?;
        }
        rows.insert(ticket.id, ticket.clone());
        Ok(())
    }
}

/// Schedule store implementing the watermark compare-and-set.
#[derive(Default)]
pub struct InMemoryScheduleRepository {
    rows: Mutex<HashMap<ScheduleId, MaintenanceSchedule>>,
}

impl InMemoryScheduleRepository {
    pub fn get(&self, id: ScheduleId) -> MaintenanceSchedule {
        self.rows
            .lock()
            .expect("schedule lock")
            .get(&id)
            .cloned()
            .expect("seeded schedule")
    }
}

#[async_trait]
impl MaintenanceScheduleRepository for InMemoryScheduleRepository {
    async fn find_by_id(
        &self,
        id: ScheduleId,
    ) -> Result<Option<MaintenanceSchedule>, MaintenanceScheduleRepositoryError> {
        Ok(self.rows.lock().expect("schedule lock").get(&id).cloned())
    }

    async fn insert(
        &self,
        schedule: &MaintenanceSchedule,
    ) -> Result<(), MaintenanceScheduleRepositoryError> {
        self.rows
            .lock()
            .expect("schedule lock")
            .insert(schedule.id, schedule.clone());
        Ok(())
    }

    async fn update(
        &self,
        schedule: &MaintenanceSchedule,
    ) -> Result<(), MaintenanceScheduleRepositoryError> {
        self.rows
            .lock()
            .expect("schedule lock")
            .insert(schedule.id, schedule.clone());
        Ok(())
    }

    async fn list_active_due_before(
        &self,
        cutoff: DateTime<Utc>,
    ) -> Result<Vec<MaintenanceSchedule>, MaintenanceScheduleRepositoryError> {
        Ok(self
            .rows
            .lock()
            .expect("schedule lock")
            .values()
            .filter(|s| s.is_active && s.next_maintenance_date < cutoff)
            .cloned()
            .collect())
    }

    async fn claim_overdue_notification(
        &self,
        id: ScheduleId,
        due_date: DateTime<Utc>,
    ) -> Result<bool, MaintenanceScheduleRepositoryError> {
        let mut rows = self.rows.lock().expect("schedule lock");
        let Some(schedule) = rows.get_mut(&id) else {
            return Ok(false);
        };
        if schedule.next_maintenance_date != due_date
            || schedule.overdue_notified_for == Some(due_date)
        {
            return Ok(false);
        }
        schedule.overdue_notified_for = Some(due_date);
        Ok(true)
    }

    async fn count_active(&self) -> Result<u64, MaintenanceScheduleRepositoryError> {
        Ok(self
            .rows
            .lock()
            .expect("schedule lock")
            .values()
            .filter(|s| s.is_active)
            .count() as u64)
    }

    async fn count_active_due_before(
        &self,
        cutoff: DateTime<Utc>,
    ) -> Result<u64, MaintenanceScheduleRepositoryError> {
        Ok(self
            .rows
            .lock()
            .expect("schedule lock")
            .values()
            .filter(|s| s.is_active && s.next_maintenance_date < cutoff)
            .count() as u64)
    }

    async fn count_active_due_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<u64, MaintenanceScheduleRepositoryError> {
        Ok(self
            .rows
            .lock()
            .expect("schedule lock")
            .values()
            .filter(|s| {
                s.is_active && s.next_maintenance_date >= from && s.next_maintenance_date <= to
            })
            .count() as u64)
    }
}

/// Fixed directory of active users.
pub struct InMemoryUserDirectory {
    users: Vec<User>,
}

impl InMemoryUserDirectory {
    pub fn new(users: Vec<User>) -> Self {
        Self { users }
    }
}

#[async_trait]
impl UserDirectory for InMemoryUserDirectory {
    async fn find_user(&self, id: UserId) -> Result<Option<User>, UserDirectoryError> {
        Ok(self.users.iter().find(|u| u.id == id).cloned())
    }

    async fn department_leads(
        &self,
        department_id: DepartmentId,
    ) -> Result<Vec<User>, UserDirectoryError> {
        Ok(self
            .users
            .iter()
            .filter(|u| {
                u.is_active
                    && (u.role == Role::Manager
                        || (u.role == Role::DepartmentHead
                            && u.department_id == Some(department_id)))
            })
            .cloned()
            .collect())
    }

    async fn operational_staff(&self) -> Result<Vec<User>, UserDirectoryError> {
        Ok(self
            .users
            .iter()
            .filter(|u| {
                u.is_active
                    && matches!(
                        u.role,
                        Role::Manager | Role::DepartmentHead | Role::Support
                    )
            })
            .cloned()
            .collect())
    }
}

/// Notification store with recipient-scoped reads and mutations.
#[derive(Default)]
pub struct InMemoryNotificationRepository {
    rows: Mutex<Vec<Notification>>,
}

impl InMemoryNotificationRepository {
    pub fn all_for(&self, recipient_id: UserId) -> Vec<Notification> {
        self.rows
            .lock()
            .expect("notification lock")
            .iter()
            .filter(|n| n.recipient_id == recipient_id)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl NotificationRepository for InMemoryNotificationRepository {
    async fn insert_batch(
        &self,
        notifications: &[Notification],
    ) -> Result<(), NotificationRepositoryError> {
        self.rows
            .lock()
            .expect("notification lock")
            .extend_from_slice(notifications);
        Ok(())
    }

    async fn find_for_recipient(
        &self,
        id: NotificationId,
        recipient_id: UserId,
    ) -> Result<Option<Notification>, NotificationRepositoryError> {
        Ok(self
            .rows
            .lock()
            .expect("notification lock")
            .iter()
            .find(|n| n.id == id && n.recipient_id == recipient_id)
            .cloned())
    }

    async fn update(
        &self,
        notification: &Notification,
    ) -> Result<(), NotificationRepositoryError> {
        let mut rows = self.rows.lock().expect("notification lock");
        if let Some(stored) = rows.iter_mut().find(|n| n.id == notification.id) {
            *stored = notification.clone();
        }
        Ok(())
    }

    async fn mark_all_read(
        &self,
        recipient_id: UserId,
        read_at: DateTime<Utc>,
    ) -> Result<u64, NotificationRepositoryError> {
        let mut changed = 0;
        for notification in self
            .rows
            .lock()
            .expect("notification lock")
            .iter_mut()
            .filter(|n| n.recipient_id == recipient_id && !n.is_read)
        {
            notification.mark_read(read_at);
            changed += 1;
        }
        Ok(changed)
    }

    async fn delete(
        &self,
        id: NotificationId,
        recipient_id: UserId,
    ) -> Result<bool, NotificationRepositoryError> {
        let mut rows = self.rows.lock().expect("notification lock");
        let before = rows.len();
        rows.retain(|n| !(n.id == id && n.recipient_id == recipient_id));
        Ok(rows.len() < before)
    }

    async fn unread_count(
        &self,
        recipient_id: UserId,
    ) -> Result<u64, NotificationRepositoryError> {
        Ok(self
            .rows
            .lock()
            .expect("notification lock")
            .iter()
            .filter(|n| n.recipient_id == recipient_id && !n.is_read)
            .count() as u64)
    }

    async fn list_for_recipient(
        &self,
        recipient_id: UserId,
        request: &PageRequest,
        unread_only: bool,
    ) -> Result<(Vec<Notification>, u64), NotificationRepositoryError> {
        let rows = self.rows.lock().expect("notification lock");
        let mut matching: Vec<Notification> = rows
            .iter()
            .filter(|n| n.recipient_id == recipient_id && (!unread_only || !n.is_read))
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        let total = matching.len() as u64;
        let offset = usize::try_from(request.offset()).unwrap_or(usize::MAX);
        let page = matching
            .into_iter()
            .skip(offset)
            .take(request.page_size() as usize)
            .collect();
        Ok((page, total))
    }
}

/// Badge cache backed by a map, so scenarios exercise real hit/miss and
/// invalidation behaviour.
#[derive(Default)]
pub struct InMemoryBadgeCache {
    entries: Mutex<HashMap<UserId, u64>>,
}

#[async_trait]
impl UnreadBadgeCache for InMemoryBadgeCache {
    async fn get(&self, recipient_id: UserId) -> Result<Option<u64>, UnreadBadgeCacheError> {
        Ok(self
            .entries
            .lock()
            .expect("cache lock")
            .get(&recipient_id)
            .copied())
    }

    async fn put(&self, recipient_id: UserId, count: u64) -> Result<(), UnreadBadgeCacheError> {
        self.entries
            .lock()
            .expect("cache lock")
            .insert(recipient_id, count);
        Ok(())
    }

    async fn invalidate(&self, recipient_id: UserId) -> Result<(), UnreadBadgeCacheError> {
        self.entries.lock().expect("cache lock").remove(&recipient_id);
        Ok(())
    }
}
