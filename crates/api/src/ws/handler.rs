use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Query, State};
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::handlers::message::{chat_access, send_message};
use crate::middleware::auth::{authenticate, AuthUser};
use crate::state::AppState;
use crate::ws::protocol::{ClientFrame, ServerFrame};

/// Query parameters for `GET /ws`. Browsers cannot set headers on a
/// WebSocket handshake, so the access token travels in the URL.
#[derive(Debug, Deserialize)]
pub struct WsParams {
    pub token: String,
}

/// HTTP handler that authenticates and upgrades the connection.
///
/// A missing or invalid token is rejected with 401 before the upgrade.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
    Query(params): Query<WsParams>,
) -> AppResult<impl IntoResponse> {
    let auth = authenticate(&params.token, &state)?;
    Ok(ws.on_upgrade(move |socket| handle_socket(socket, state, auth)))
}

/// Manage a single WebSocket connection after upgrade.
///
/// Splits the socket into a sink (outbound) and stream (inbound), then:
///   1. Registers the connection with `WsManager`.
///   2. Spawns a sender task that forwards messages from the manager channel.
///   3. Dispatches inbound frames on the current task.
///   4. Cleans up on disconnect.
async fn handle_socket(socket: WebSocket, state: AppState, auth: AuthUser) {
    let conn_id = uuid::Uuid::new_v4().to_string();
    tracing::info!(conn_id = %conn_id, user_id = auth.user_id, "WebSocket connected");

    let ws_manager = state.ws_manager.clone();
    let mut rx = ws_manager.add(conn_id.clone(), auth.user_id).await;

    let (mut sink, mut stream) = socket.split();

    let sender_conn_id = conn_id.clone();
    let send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            let closing = matches!(msg, Message::Close(_));
            if sink.send(msg).await.is_err() || closing {
                tracing::debug!(conn_id = %sender_conn_id, "WebSocket sink closed");
                break;
            }
        }
    });

    while let Some(result) = stream.next().await {
        match result {
            Ok(Message::Close(_)) => break,
            Ok(Message::Pong(_)) => {
                tracing::trace!(conn_id = %conn_id, "Pong received");
            }
            Ok(Message::Text(text)) => {
                let reply = match serde_json::from_str::<ClientFrame>(text.as_str()) {
                    Ok(frame) => dispatch(&state, &conn_id, &auth, frame).await,
                    Err(e) => Err(AppError::BadRequest(format!("Malformed frame: {e}"))),
                };
                let reply = match reply {
                    Ok(Some(frame)) => frame,
                    Ok(None) => continue,
                    Err(err) => ServerFrame::from_error(&err),
                };
                ws_manager.send_to(&conn_id, reply.to_message()).await;
            }
            Ok(_) => {}
            Err(e) => {
                tracing::debug!(conn_id = %conn_id, error = %e, "WebSocket receive error");
                break;
            }
        }
    }

    ws_manager.remove(&conn_id).await;
    send_task.abort();
    tracing::info!(conn_id = %conn_id, "WebSocket disconnected");
}

/// Handle one inbound frame. Returns the direct reply, if any.
///
/// A `send` has no direct reply: the message comes back through the room
/// like it does for every other member.
async fn dispatch(
    state: &AppState,
    conn_id: &str,
    auth: &AuthUser,
    frame: ClientFrame,
) -> AppResult<Option<ServerFrame>> {
    let caller = auth.caller();
    match frame {
        ClientFrame::Join { project_id } => {
            chat_access(state, &caller, project_id)
                .await?
                .ensure_can_read()?;
            state.ws_manager.join(conn_id, project_id).await;
            tracing::debug!(conn_id, project_id, "Joined project room");
            Ok(Some(ServerFrame::Joined { project_id }))
        }
        ClientFrame::Leave { project_id } => {
            state.ws_manager.leave(conn_id, project_id).await;
            Ok(Some(ServerFrame::Left { project_id }))
        }
        ClientFrame::Send { project_id, text } => {
            send_message(state, &caller, project_id, &text).await?;
            Ok(None)
        }
    }
}
