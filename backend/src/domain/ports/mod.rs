//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (repositories, directory, cache) are implemented by outbound
//! adapters; driving ports (workflow, planning, sweep, dispatch, feed) are
//! implemented by the services in this crate and called by inbound adapters.
//! Each driven port exposes strongly typed errors so adapters map their
//! failures into predictable variants instead of returning `anyhow::Result`.

mod macros;
pub(crate) use macros::define_port_error;

mod equipment_repository;
mod equipment_status;
mod maintenance_planning;
mod maintenance_repository;
mod notification_dispatch;
mod notification_feed;
mod notification_repository;
mod overdue_sweep;
mod ticket_repository;
mod ticket_workflow;
mod unread_badge_cache;
mod user_directory;

#[cfg(test)]
pub use equipment_repository::MockEquipmentRepository;
pub use equipment_repository::{
    EquipmentRepository, EquipmentRepositoryError, FixtureEquipmentRepository,
};
#[cfg(test)]
pub use equipment_status::MockEquipmentStatusCommand;
pub use equipment_status::EquipmentStatusCommand;
#[cfg(test)]
pub use maintenance_planning::{MockMaintenancePlanning, MockMaintenanceQuery};
pub use maintenance_planning::{MaintenancePlanning, MaintenanceQuery, ScheduleDraft};
#[cfg(test)]
pub use maintenance_repository::MockMaintenanceScheduleRepository;
pub use maintenance_repository::{
    FixtureMaintenanceScheduleRepository, MaintenanceScheduleRepository,
    MaintenanceScheduleRepositoryError,
};
#[cfg(test)]
pub use notification_dispatch::MockNotificationDispatch;
pub use notification_dispatch::{FixtureNotificationDispatch, NotificationDispatch};
#[cfg(test)]
pub use notification_feed::MockNotificationFeed;
pub use notification_feed::{NotificationFeed, NotificationListRequest};
#[cfg(test)]
pub use notification_repository::MockNotificationRepository;
pub use notification_repository::{
    FixtureNotificationRepository, NotificationRepository, NotificationRepositoryError,
};
#[cfg(test)]
pub use overdue_sweep::MockOverdueSweep;
pub use overdue_sweep::{OverdueSweep, SweepReport};
#[cfg(test)]
pub use ticket_repository::MockTicketRepository;
pub use ticket_repository::{FixtureTicketRepository, TicketRepository, TicketRepositoryError};
#[cfg(test)]
pub use ticket_workflow::MockTicketWorkflow;
pub use ticket_workflow::{OpenTicketRequest, TicketWorkflow};
#[cfg(test)]
pub use unread_badge_cache::MockUnreadBadgeCache;
pub use unread_badge_cache::{NoOpUnreadBadgeCache, UnreadBadgeCache, UnreadBadgeCacheError};
#[cfg(test)]
pub use user_directory::MockUserDirectory;
pub use user_directory::{FixtureUserDirectory, UserDirectory, UserDirectoryError};
