//! Ticket, maintenance, and notification engine for facility equipment
//! tracking.
//!
//! The crate is organised hexagonally: `domain` holds entities, services, and
//! the port traits collaborators implement. Inbound adapters (HTTP, cron) and
//! outbound adapters (persistence, caches) live outside this crate and talk
//! to the engine exclusively through `domain::ports`.

pub mod domain;
