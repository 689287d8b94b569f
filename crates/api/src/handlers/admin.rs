//! Handlers for the `/admin` resource.
//!
//! All handlers require the `admin` role via [`RequireAdmin`].

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use gigboard_core::error::CoreError;
use gigboard_core::types::DbId;
use gigboard_db::models::application::Application;
use gigboard_db::models::event::Event;
use gigboard_db::models::project::{Project, ProjectDetail, ProjectFilter};
use gigboard_db::models::stats::PlatformStats;
use gigboard_db::models::user::UserResponse;
use gigboard_db::repositories::{ApplicationRepo, EventRepo, ProjectRepo, UserRepo};
use gigboard_events::types::{ENTITY_USER, USER_DELETED};
use gigboard_events::PlatformEvent;

use crate::error::{AppError, AppResult};
use crate::handlers::project::{
    apply_update, delete_cascade, find_project, with_people, UpdateProjectRequest,
};
use crate::middleware::rbac::RequireAdmin;
use crate::query::PaginationParams;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

/// GET /api/v1/admin/users
pub async fn list_users(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> AppResult<Json<Vec<UserResponse>>> {
    let users = UserRepo::list(&state.pool).await?;
    Ok(Json(users.iter().map(UserResponse::from).collect()))
}

/// GET /api/v1/admin/users/{id}
pub async fn get_user(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<Json<UserResponse>> {
    let user = UserRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "User", id }))?;
    Ok(Json(UserResponse::from(&user)))
}

/// DELETE /api/v1/admin/users/{id}
///
/// Removes the account with its profile, projects and applications. A
/// freelancer still assigned to a project must be released first.
pub async fn delete_user(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if id == admin.user_id {
        return Err(CoreError::Validation("Cannot delete yourself".into()).into());
    }

    let assigned = UserRepo::count_assignments(&state.pool, id).await?;
    if assigned > 0 {
        return Err(CoreError::Conflict(format!(
            "User is assigned to {assigned} project(s); reopen them first"
        ))
        .into());
    }

    if !UserRepo::delete(&state.pool, id).await? {
        return Err(CoreError::NotFound { entity: "User", id }.into());
    }

    tracing::info!(user_id = id, admin_id = admin.user_id, "User deleted");
    state.publish(
        PlatformEvent::new(USER_DELETED)
            .with_source(ENTITY_USER, id)
            .with_actor(admin.user_id),
    );
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/admin/stats
pub async fn platform_stats(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> AppResult<Json<PlatformStats>> {
    Ok(Json(PlatformStats {
        users: UserRepo::stats(&state.pool).await?,
        projects: ProjectRepo::stats(&state.pool).await?,
        applications: ApplicationRepo::stats(&state.pool).await?,
    }))
}

// ---------------------------------------------------------------------------
// Projects and applications
// ---------------------------------------------------------------------------

/// GET /api/v1/admin/projects
pub async fn list_projects(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> AppResult<Json<Vec<ProjectDetail>>> {
    let projects = ProjectRepo::list(&state.pool, &ProjectFilter::default()).await?;
    Ok(Json(with_people(&state.pool, projects).await?))
}

/// PUT /api/v1/admin/projects/{id}
///
/// Like the owner's edit, plus `status`. Setting `open` releases the
/// freelancer; assigning statuses need someone already assigned.
pub async fn update_project(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateProjectRequest>,
) -> AppResult<Json<Project>> {
    let patch = input.into_patch(true)?;
    let current = find_project(&state.pool, id).await?;
    apply_update(&state, admin.caller(), &current, &patch)
        .await
        .map(Json)
}

/// DELETE /api/v1/admin/projects/{id}
pub async fn delete_project(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    delete_cascade(&state, admin.caller(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/admin/applications
pub async fn list_applications(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> AppResult<Json<Vec<Application>>> {
    Ok(Json(ApplicationRepo::list_all(&state.pool).await?))
}

/// GET /api/v1/admin/events?limit=&offset=
///
/// The persisted event log, newest first.
pub async fn list_events(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<Vec<Event>>> {
    let events = EventRepo::list_recent(&state.pool, params.limit(), params.offset()).await?;
    Ok(Json(events))
}
