//! Gigboard event bus.
//!
//! - [`EventBus`]: in-process publish/subscribe hub backed by
//!   `tokio::sync::broadcast`.
//! - [`PlatformEvent`]: the domain event envelope.
//! - [`EventPersistence`]: background service that writes every event to
//!   the `events` table.
//!
//! Publishing is fire-and-forget. A handler persists its change first and
//! publishes afterwards, so a lost or lagging subscriber never undoes a
//! committed write.

pub mod bus;
pub mod persistence;
pub mod types;

pub use bus::{EventBus, PlatformEvent};
pub use persistence::EventPersistence;
