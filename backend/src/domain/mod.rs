//! Domain entities, services, and events.
//!
//! Purpose: implement the ticket workflow, maintenance scheduling, and
//! notification fan-out over strongly typed aggregates. Types are kept free
//! of transport and storage concerns; adapters reach them through the traits
//! in [`ports`].

pub mod ports;

pub mod equipment;
pub mod equipment_service;
mod error;
pub mod events;
mod ids;
pub mod maintenance;
pub mod maintenance_service;
pub mod notification;
pub mod notification_service;
pub mod role;
pub mod ticket;
pub mod ticket_service;
pub mod user;

pub use self::equipment::{Equipment, EquipmentStatus};
pub use self::equipment_service::EquipmentStatusService;
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::events::DomainEvent;
pub use self::ids::{
    DepartmentId, EquipmentId, IdParseError, NotificationId, ScheduleId, TicketId, UserId,
};
pub use self::maintenance::{MaintenanceSchedule, MaintenanceStanding, MaintenanceStats};
pub use self::maintenance_service::MaintenancePlanningService;
pub use self::notification::{
    NewNotification, Notification, NotificationKind, RelatedEntity, RelatedEntityKind,
};
pub use self::notification_service::NotificationService;
pub use self::role::{Actor, Capability, Role, SupportType};
pub use self::ticket::{Ticket, TicketPriority, TicketStatus};
pub use self::ticket_service::TicketWorkflowService;
pub use self::user::User;

/// Convenient result alias for engine operations.
pub type DomainResult<T> = Result<T, Error>;
