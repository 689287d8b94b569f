//! Route definitions for the `/projects` resource.
//!
//! Also nests the project chat under `/projects/{id}/messages`.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{message, project};
use crate::state::AppState;

/// Routes mounted at `/projects`.
///
/// ```text
/// GET    /                       -> list
/// POST   /                       -> create (client)
/// GET    /mine                   -> mine
/// GET    /stats                  -> stats (admin)
/// GET    /{id}                   -> get_by_id
/// PUT    /{id}                   -> update (owner or admin)
/// DELETE /{id}                   -> delete (owner or admin)
/// POST   /{id}/submit            -> submit_work (assigned freelancer)
/// POST   /{id}/opt-out           -> opt_out (assigned freelancer)
/// GET    /{id}/applications      -> list_applications (owner or admin)
/// GET    /{id}/messages          -> history (participants or admin)
/// POST   /{id}/messages          -> send (participants)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(project::list).post(project::create))
        .route("/mine", get(project::mine))
        .route("/stats", get(project::stats))
        .route(
            "/{id}",
            get(project::get_by_id)
                .put(project::update)
                .delete(project::delete),
        )
        .route("/{id}/submit", post(project::submit_work))
        .route("/{id}/opt-out", post(project::opt_out))
        .route("/{id}/applications", get(project::list_applications))
        .route("/{id}/messages", get(message::history).post(message::send))
}
