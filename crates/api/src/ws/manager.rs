use std::collections::{HashMap, HashSet};

use axum::body::Bytes;
use axum::extract::ws::Message;
use gigboard_core::types::{DbId, Timestamp};
use tokio::sync::{mpsc, RwLock};

/// Channel sender half for pushing messages to a WebSocket connection.
pub type WsSender = mpsc::UnboundedSender<Message>;

/// Metadata for a single WebSocket connection.
pub struct WsConnection {
    /// Authenticated user behind the connection.
    pub user_id: DbId,
    /// Channel sender for outbound messages to this connection.
    pub sender: WsSender,
    /// When this connection was established.
    pub connected_at: Timestamp,
    /// Project rooms this connection has joined.
    pub rooms: HashSet<DbId>,
}

/// Manages all active WebSocket connections and their project rooms.
///
/// A room is keyed by project id. Membership lives on the connection, so
/// removing a connection drops it from every room at once. Delivery is
/// best-effort: a closed channel is skipped, never retried.
pub struct WsManager {
    connections: RwLock<HashMap<String, WsConnection>>,
}

impl WsManager {
    /// Create a new, empty connection manager.
    pub fn new() -> Self {
        Self {
            connections: RwLock::new(HashMap::new()),
        }
    }

    /// Register a new connection.
    ///
    /// Returns the receiver half of the message channel so the caller can
    /// forward messages to the WebSocket sink.
    pub async fn add(&self, conn_id: String, user_id: DbId) -> mpsc::UnboundedReceiver<Message> {
        let (tx, rx) = mpsc::unbounded_channel();
        let conn = WsConnection {
            user_id,
            sender: tx,
            connected_at: chrono::Utc::now(),
            rooms: HashSet::new(),
        };
        self.connections.write().await.insert(conn_id, conn);
        rx
    }

    /// Remove a connection by its ID, leaving all of its rooms.
    pub async fn remove(&self, conn_id: &str) {
        self.connections.write().await.remove(conn_id);
    }

    /// Add a connection to a project room. Returns `false` if the connection
    /// is unknown. Joining twice is harmless.
    pub async fn join(&self, conn_id: &str, project_id: DbId) -> bool {
        match self.connections.write().await.get_mut(conn_id) {
            Some(conn) => {
                conn.rooms.insert(project_id);
                true
            }
            None => false,
        }
    }

    /// Remove a connection from a project room. Returns `true` if it was a
    /// member.
    pub async fn leave(&self, conn_id: &str, project_id: DbId) -> bool {
        self.connections
            .write()
            .await
            .get_mut(conn_id)
            .is_some_and(|conn| conn.rooms.remove(&project_id))
    }

    /// Remove every connection of `user_id` from a room.
    ///
    /// Returns the ids of the connections that were members.
    pub async fn evict_user(&self, user_id: DbId, project_id: DbId) -> Vec<String> {
        self.connections
            .write()
            .await
            .iter_mut()
            .filter(|(_, conn)| conn.user_id == user_id)
            .filter_map(|(conn_id, conn)| conn.rooms.remove(&project_id).then(|| conn_id.clone()))
            .collect()
    }

    /// Empty a room. Returns the ids of the connections that were members.
    pub async fn clear_room(&self, project_id: DbId) -> Vec<String> {
        self.connections
            .write()
            .await
            .iter_mut()
            .filter_map(|(conn_id, conn)| conn.rooms.remove(&project_id).then(|| conn_id.clone()))
            .collect()
    }

    /// Number of connections currently in a room.
    pub async fn room_size(&self, project_id: DbId) -> usize {
        self.connections
            .read()
            .await
            .values()
            .filter(|conn| conn.rooms.contains(&project_id))
            .count()
    }

    /// Send a message to every connection in a room.
    ///
    /// Returns the number of connections the message was handed to.
    pub async fn send_to_room(&self, project_id: DbId, message: Message) -> usize {
        let conns = self.connections.read().await;
        let mut count = 0;
        for conn in conns.values().filter(|c| c.rooms.contains(&project_id)) {
            if conn.sender.send(message.clone()).is_ok() {
                count += 1;
            }
        }
        count
    }

    /// Send a message to one connection. Returns `false` if it is gone.
    pub async fn send_to(&self, conn_id: &str, message: Message) -> bool {
        self.connections
            .read()
            .await
            .get(conn_id)
            .is_some_and(|conn| conn.sender.send(message).is_ok())
    }

    /// Return the current number of active connections.
    pub async fn connection_count(&self) -> usize {
        self.connections.read().await.len()
    }

    /// Send a Close frame to every connection, then clear the map.
    ///
    /// Used during graceful shutdown to notify all clients before the
    /// server stops.
    pub async fn shutdown_all(&self) {
        let mut conns = self.connections.write().await;
        let count = conns.len();
        for conn in conns.values() {
            let _ = conn.sender.send(Message::Close(None));
        }
        conns.clear();
        tracing::info!(count, "Closed all WebSocket connections");
    }

    /// Send a Ping frame to every connected client.
    pub async fn ping_all(&self) {
        let conns = self.connections.read().await;
        for conn in conns.values() {
            let _ = conn.sender.send(Message::Ping(Bytes::new()));
        }
    }
}

impl Default for WsManager {
    fn default() -> Self {
        Self::new()
    }
}
