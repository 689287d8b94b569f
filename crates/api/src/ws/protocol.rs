//! JSON text frames exchanged over the live channel.
//!
//! Inbound:
//!
//! ```text
//! {"type":"join","project_id":7}
//! {"type":"leave","project_id":7}
//! {"type":"send","project_id":7,"text":"hello"}
//! ```
//!
//! Outbound frames are `joined`, `left`, `message`, `event` and `error`.

use axum::extract::ws::Message;
use gigboard_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// A frame sent by the client.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientFrame {
    Join { project_id: DbId },
    Leave { project_id: DbId },
    Send { project_id: DbId, text: String },
}

/// A frame pushed to the client.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerFrame {
    Joined {
        project_id: DbId,
    },
    Left {
        project_id: DbId,
    },
    /// A chat message, in the same shape the history endpoint returns.
    Message {
        message: serde_json::Value,
    },
    /// A project lifecycle event.
    Event {
        event_type: String,
        project_id: DbId,
        actor_user_id: Option<DbId>,
        payload: serde_json::Value,
        timestamp: Timestamp,
    },
    Error {
        code: String,
        error: String,
    },
}

impl ServerFrame {
    /// Error frame carrying the same code and message as the HTTP body.
    pub fn from_error(err: &AppError) -> Self {
        let (_, code, error) = err.parts();
        ServerFrame::Error {
            code: code.to_string(),
            error,
        }
    }

    /// Encode as a WebSocket text message.
    pub fn to_message(&self) -> Message {
        match serde_json::to_string(self) {
            Ok(text) => Message::Text(text.into()),
            Err(e) => {
                tracing::error!(error = %e, "Failed to encode WebSocket frame");
                Message::Text(r#"{"type":"error","code":"INTERNAL_ERROR","error":"encoding failed"}"#.into())
            }
        }
    }
}
