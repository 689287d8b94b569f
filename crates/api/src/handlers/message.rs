//! Handlers for project chat (`/projects/{id}/messages`).
//!
//! Sending persists the message and then publishes `message.sent`; the chat
//! relay pushes it to the project room. A failed or slow fan-out never
//! affects the stored copy.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use gigboard_core::caller::Caller;
use gigboard_core::messaging::{normalize_text, ChatAccess};
use gigboard_core::types::DbId;
use gigboard_db::models::message::{CreateMessage, Message};
use gigboard_db::repositories::MessageRepo;
use gigboard_events::types::{ENTITY_MESSAGE, MESSAGE_SENT};
use gigboard_events::PlatformEvent;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::handlers::project::find_project;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Request body for `POST /projects/{id}/messages`. The sender role comes
/// from the caller's token.
#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    pub text: String,
}

/// GET /api/v1/projects/{id}/messages
///
/// Full history, oldest first. Participants and admins.
pub async fn history(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(project_id): Path<DbId>,
) -> AppResult<Json<Vec<Message>>> {
    chat_access(&state, &auth.caller(), project_id)
        .await?
        .ensure_can_read()?;

    Ok(Json(
        MessageRepo::list_for_project(&state.pool, project_id).await?,
    ))
}

/// POST /api/v1/projects/{id}/messages
pub async fn send(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(project_id): Path<DbId>,
    Json(input): Json<SendMessageRequest>,
) -> AppResult<(StatusCode, Json<Message>)> {
    let message = send_message(&state, &auth.caller(), project_id, &input.text).await?;
    Ok((StatusCode::CREATED, Json(message)))
}

/// How `caller` relates to the chat of `project_id`.
pub async fn chat_access(
    state: &AppState,
    caller: &Caller,
    project_id: DbId,
) -> AppResult<ChatAccess> {
    let project = find_project(&state.pool, project_id).await?;
    Ok(ChatAccess::resolve(
        caller,
        project.client_id,
        project.freelancer_id,
    ))
}

/// Validate, persist, then announce a chat message.
///
/// Shared by the HTTP route and the WebSocket `send` frame.
pub async fn send_message(
    state: &AppState,
    caller: &Caller,
    project_id: DbId,
    text: &str,
) -> AppResult<Message> {
    let sender_role = chat_access(state, caller, project_id)
        .await?
        .ensure_can_send()?;
    let text = normalize_text(text)?;

    let message = MessageRepo::create(
        &state.pool,
        &CreateMessage {
            project_id,
            sender_id: caller.user_id,
            sender_role,
            text,
        },
    )
    .await?;

    let payload = serde_json::to_value(&message)
        .map_err(|e| AppError::InternalError(format!("Message serialization error: {e}")))?;
    state.publish(
        PlatformEvent::new(MESSAGE_SENT)
            .with_source(ENTITY_MESSAGE, message.id)
            .with_project(project_id)
            .with_actor(caller.user_id)
            .with_payload(payload),
    );

    Ok(message)
}
