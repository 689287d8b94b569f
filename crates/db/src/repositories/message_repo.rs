//! Repository for the `messages` table.

use gigboard_core::types::DbId;
use sqlx::PgPool;

use crate::models::message::{CreateMessage, Message};

/// Column list shared across queries, read from `messages m JOIN users u`.
const COLUMNS: &str = concat!(
    "m.id, m.project_id, m.sender_id, u.username AS sender_username, ",
    "m.sender_role, m.text, m.sent_at"
);

/// Append-only access to project chat history.
pub struct MessageRepo;

impl MessageRepo {
    /// Append a message, returning the stored row.
    pub async fn create(pool: &PgPool, input: &CreateMessage) -> Result<Message, sqlx::Error> {
        let query = format!(
            "WITH m AS (
                 INSERT INTO messages (project_id, sender_id, sender_role, text)
                 VALUES ($1, $2, $3, $4)
                 RETURNING *
             )
             SELECT {COLUMNS} FROM m JOIN users u ON u.id = m.sender_id"
        );
        sqlx::query_as::<_, Message>(&query)
            .bind(input.project_id)
            .bind(input.sender_id)
            .bind(input.sender_role.as_str())
            .bind(&input.text)
            .fetch_one(pool)
            .await
    }

    /// Full history of a project, oldest first. Ties on `sent_at` fall back
    /// to insertion order.
    pub async fn list_for_project(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<Message>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM messages m JOIN users u ON u.id = m.sender_id
             WHERE m.project_id = $1
             ORDER BY m.sent_at ASC, m.id ASC"
        );
        sqlx::query_as::<_, Message>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }
}
