//! Chat message model.

use gigboard_core::roles::Role;
use gigboard_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `messages` table, with the sender's display name.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Message {
    pub id: DbId,
    pub project_id: DbId,
    pub sender_id: DbId,
    pub sender_username: String,
    #[sqlx(try_from = "String")]
    pub sender_role: Role,
    pub text: String,
    pub sent_at: Timestamp,
}

/// DTO for appending a message. Text is already trimmed and validated.
#[derive(Debug, Clone)]
pub struct CreateMessage {
    pub project_id: DbId,
    pub sender_id: DbId,
    pub sender_role: Role,
    pub text: String,
}
