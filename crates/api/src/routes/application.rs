//! Route definitions for the `/applications` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::application;
use crate::state::AppState;

/// Routes mounted at `/applications`.
///
/// ```text
/// POST   /                 -> submit (freelancer)
/// GET    /mine             -> mine (freelancer)
/// GET    /stats            -> stats (admin)
/// POST   /{id}/accept      -> accept (owning client)
/// POST   /{id}/reject      -> reject (owning client)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(application::submit))
        .route("/mine", get(application::mine))
        .route("/stats", get(application::stats))
        .route("/{id}/accept", post(application::accept))
        .route("/{id}/reject", post(application::reject))
}
