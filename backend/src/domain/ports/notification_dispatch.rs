//! Driving port for event fan-out.
//!
//! State-changing services raise [`DomainEvent`]s through this port; the
//! notification service implements it. Dispatch happens after the state
//! commit, so implementations must never fail the originating operation:
//! emitters log dispatch failures and move on.

use async_trait::async_trait;

use crate::domain::{DomainEvent, Error, Notification};

/// Driving port turning domain events into per-recipient notifications.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationDispatch: Send + Sync {
    /// Fan an event out to zero or more recipients. Returns the created
    /// rows.
    async fn dispatch(&self, event: DomainEvent) -> Result<Vec<Notification>, Error>;
}

/// Dispatcher that drops every event. For tests and wiring that does not
/// exercise notifications.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureNotificationDispatch;

#[async_trait]
impl NotificationDispatch for FixtureNotificationDispatch {
    async fn dispatch(&self, _event: DomainEvent) -> Result<Vec<Notification>, Error> {
        Ok(Vec::new())
    }
}
