use std::sync::Arc;

use gigboard_events::{EventBus, PlatformEvent};

use crate::config::ServerConfig;
use crate::ws::WsManager;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: gigboard_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// WebSocket connections and their project rooms.
    pub ws_manager: Arc<WsManager>,
    /// Platform event bus. Handlers publish after their writes commit.
    pub event_bus: Arc<EventBus>,
}

impl AppState {
    /// Publish an event. Never fails; with no subscribers it is dropped.
    pub fn publish(&self, event: PlatformEvent) {
        self.event_bus.publish(event);
    }
}
