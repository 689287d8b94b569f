pub mod admin;
pub mod application;
pub mod auth;
pub mod health;
pub mod project;
pub mod users;

use axum::routing::get;
use axum::Router;

use crate::state::AppState;
use crate::ws;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /ws?token=<jwt>                                  live project chat
///
/// /auth/register                                   register (public)
/// /auth/login                                      login (public)
///
/// /users/profile                                   get, update own profile
/// /users/freelancers/{user_id}                     freelancer profile
///
/// /projects                                        list (filter), create
/// /projects/mine                                   own projects by role
/// /projects/stats                                  counts by status (admin)
/// /projects/{id}                                   get, update, delete
/// /projects/{id}/submit                            submit work (POST)
/// /projects/{id}/opt-out                           opt out (POST)
/// /projects/{id}/applications                      applications for project
/// /projects/{id}/messages                          history, send
///
/// /applications                                    submit
/// /applications/mine                               own applications
/// /applications/stats                              counts by status (admin)
/// /applications/{id}/accept                        accept (POST)
/// /applications/{id}/reject                        reject (POST)
///
/// /admin/users                                     list (admin only)
/// /admin/users/{id}                                get, delete
/// /admin/stats                                     platform counts
/// /admin/projects                                  list all
/// /admin/projects/{id}                             update (with status), delete
/// /admin/applications                              list all
/// /admin/events                                    event log
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // WebSocket endpoint.
        .route("/ws", get(ws::ws_handler))
        .nest("/auth", auth::router())
        .nest("/users", users::router())
        .nest("/projects", project::router())
        .nest("/applications", application::router())
        .nest("/admin", admin::router())
}
