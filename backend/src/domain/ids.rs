//! UUID-backed identifier newtypes.
//!
//! Every aggregate gets its own id type so a ticket id can never be handed
//! to an equipment lookup. Ids serialise as their canonical UUID string.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Error returned when parsing an identifier from a string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{kind} must be a valid UUID")]
pub struct IdParseError {
    kind: &'static str,
}

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Generate a new random identifier.
            pub fn random() -> Self {
                Self(Uuid::new_v4())
            }

            /// Parse an identifier from its canonical string form.
            pub fn parse(value: &str) -> Result<Self, IdParseError> {
                Uuid::parse_str(value).map(Self).map_err(|_| IdParseError {
                    kind: stringify!($name),
                })
            }

            /// Access the underlying UUID.
            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl From<Uuid> for $name {
            fn from(value: Uuid) -> Self {
                Self(value)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

define_id! {
    /// Stable user identifier.
    UserId
}

define_id! {
    /// Stable department identifier.
    DepartmentId
}

define_id! {
    /// Stable equipment identifier.
    EquipmentId
}

define_id! {
    /// Stable ticket identifier.
    TicketId
}

define_id! {
    /// Stable maintenance schedule identifier.
    ScheduleId
}

define_id! {
    /// Stable notification identifier.
    NotificationId
}
