//! Event-to-room relay.
//!
//! [`ChatRelay`] subscribes to the platform event bus and pushes every
//! project-scoped event into that project's WebSocket room. `message.sent`
//! becomes a `message` frame; everything else becomes an `event` frame.
//! Events without a project are ignored.
//!
//! Events that end someone's access also change room membership once the
//! frame is out: a released freelancer's connections are evicted and a
//! deleted project's room is emptied. Each evicted connection gets a `left`
//! frame.

use std::sync::Arc;

use gigboard_core::types::DbId;
use gigboard_events::types::{MESSAGE_SENT, PROJECT_DELETED, PROJECT_REOPENED, PROJECT_UPDATED};
use gigboard_events::PlatformEvent;
use tokio::sync::broadcast;

use crate::ws::protocol::ServerFrame;
use crate::ws::WsManager;

/// Forwards bus events to live project rooms.
pub struct ChatRelay {
    ws_manager: Arc<WsManager>,
}

impl ChatRelay {
    pub fn new(ws_manager: Arc<WsManager>) -> Self {
        Self { ws_manager }
    }

    /// Run the relay loop.
    ///
    /// Exits when the channel is closed (i.e. the
    /// [`EventBus`](gigboard_events::EventBus) is dropped).
    pub async fn run(self, mut receiver: broadcast::Receiver<PlatformEvent>) {
        loop {
            match receiver.recv().await {
                Ok(event) => {
                    self.relay(&event).await;
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(skipped = n, "Chat relay lagged, live events were dropped");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::info!("Event bus closed, chat relay shutting down");
                    break;
                }
            }
        }
    }

    /// Deliver one event. Returns the number of connections reached.
    pub async fn relay(&self, event: &PlatformEvent) -> usize {
        let Some(frame) = frame_for(event) else {
            return 0;
        };
        let Some(project_id) = event.project_id else {
            return 0;
        };

        let delivered = self
            .ws_manager
            .send_to_room(project_id, frame.to_message())
            .await;
        tracing::trace!(
            event_type = %event.event_type,
            project_id,
            delivered,
            "Relayed event to project room"
        );

        let evicted = match membership_change(event) {
            Some(MembershipChange::Evict(user_id)) => {
                self.ws_manager.evict_user(user_id, project_id).await
            }
            Some(MembershipChange::Close) => self.ws_manager.clear_room(project_id).await,
            None => Vec::new(),
        };
        if !evicted.is_empty() {
            let left = ServerFrame::Left { project_id }.to_message();
            for conn_id in &evicted {
                self.ws_manager.send_to(conn_id, left.clone()).await;
            }
            tracing::debug!(
                event_type = %event.event_type,
                project_id,
                evicted = evicted.len(),
                "Removed connections from project room"
            );
        }
        delivered
    }
}

/// How an event changes who may stay in its project room.
#[derive(Debug, PartialEq, Eq)]
enum MembershipChange {
    /// This user lost access to the project.
    Evict(DbId),
    /// The project is gone.
    Close,
}

fn membership_change(event: &PlatformEvent) -> Option<MembershipChange> {
    let user_field = match event.event_type.as_str() {
        PROJECT_DELETED => return Some(MembershipChange::Close),
        PROJECT_REOPENED => "freelancer_id",
        PROJECT_UPDATED => "released_freelancer_id",
        _ => return None,
    };
    event.payload[user_field].as_i64().map(MembershipChange::Evict)
}

/// The frame an event becomes in its project room, if it has one.
pub fn frame_for(event: &PlatformEvent) -> Option<ServerFrame> {
    let project_id = event.project_id?;
    let frame = if event.event_type == MESSAGE_SENT {
        ServerFrame::Message {
            message: event.payload.clone(),
        }
    } else {
        ServerFrame::Event {
            event_type: event.event_type.clone(),
            project_id,
            actor_user_id: event.actor_user_id,
            payload: event.payload.clone(),
            timestamp: event.timestamp,
        }
    };
    Some(frame)
}
