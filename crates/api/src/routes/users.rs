//! Route definitions for the `/users` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::users;
use crate::state::AppState;

/// Routes mounted at `/users`.
///
/// ```text
/// GET    /profile                  -> get_profile
/// PUT    /profile                  -> update_profile (freelancer)
/// GET    /freelancers/{user_id}    -> get_freelancer
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/profile",
            get(users::get_profile).put(users::update_profile),
        )
        .route("/freelancers/{user_id}", get(users::get_freelancer))
}
