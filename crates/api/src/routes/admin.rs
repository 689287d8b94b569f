//! Route definitions for the `/admin` resource.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::admin;
use crate::state::AppState;

/// Routes mounted at `/admin`. Every handler requires the admin role.
///
/// ```text
/// GET    /users              -> list_users
/// GET    /users/{id}         -> get_user
/// DELETE /users/{id}         -> delete_user
/// GET    /stats              -> platform_stats
/// GET    /projects           -> list_projects
/// PUT    /projects/{id}      -> update_project
/// DELETE /projects/{id}      -> delete_project
/// GET    /applications       -> list_applications
/// GET    /events             -> list_events
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users", get(admin::list_users))
        .route(
            "/users/{id}",
            get(admin::get_user).delete(admin::delete_user),
        )
        .route("/stats", get(admin::platform_stats))
        .route("/projects", get(admin::list_projects))
        .route(
            "/projects/{id}",
            put(admin::update_project).delete(admin::delete_project),
        )
        .route("/applications", get(admin::list_applications))
        .route("/events", get(admin::list_events))
}
