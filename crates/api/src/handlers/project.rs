//! Handlers for the `/projects` resource.
//!
//! Every mutation persists first and then publishes a lifecycle event scoped
//! to the project room, so live participants see the change without
//! refetching.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use gigboard_core::caller::Caller;
use gigboard_core::error::CoreError;
use gigboard_core::patch::double_option;
use gigboard_core::project::{
    validate_budget, validate_description, validate_title, ProjectStatus, SkillsInput,
};
use gigboard_core::roles::Role;
use gigboard_core::types::{Amount, DbId, Timestamp};
use gigboard_db::models::application::Application;
use gigboard_db::models::project::{
    referenced_users, CreateProject, Project, ProjectDetail, UpdateProject,
};
use gigboard_db::models::stats::ProjectStats;
use gigboard_db::repositories::{ApplicationRepo, ProjectRepo, UserRepo};
use gigboard_db::DbPool;
use gigboard_events::types::{
    ENTITY_PROJECT, PROJECT_COMPLETED, PROJECT_CREATED, PROJECT_DELETED, PROJECT_REOPENED,
    PROJECT_UPDATED,
};
use gigboard_events::PlatformEvent;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::{RequireAdmin, RequireAuth, RequireClient, RequireFreelancer};
use crate::query::ProjectListParams;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `POST /projects`.
#[derive(Debug, Deserialize)]
pub struct CreateProjectRequest {
    pub title: String,
    pub description: String,
    pub budget: Amount,
    /// A list or one comma-separated string.
    pub skills: Option<SkillsInput>,
    pub deadline: Option<Timestamp>,
}

/// Request body for `PUT /projects/{id}` and `PUT /admin/projects/{id}`.
///
/// Absent fields are left unchanged; `"deadline": null` clears the deadline.
/// `status` is only honoured on the admin route.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateProjectRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub budget: Option<Amount>,
    pub skills: Option<SkillsInput>,
    #[serde(default, deserialize_with = "double_option")]
    pub deadline: Option<Option<Timestamp>>,
    pub status: Option<ProjectStatus>,
}

impl UpdateProjectRequest {
    /// Validate the present fields and build the repository patch.
    pub fn into_patch(self, allow_status: bool) -> Result<UpdateProject, CoreError> {
        if let Some(title) = &self.title {
            validate_title(title)?;
        }
        if let Some(description) = &self.description {
            validate_description(description)?;
        }
        if let Some(budget) = self.budget {
            validate_budget(budget)?;
        }
        if self.status.is_some() && !allow_status {
            return Err(CoreError::Forbidden(
                "Only administrators can change a project's status directly".into(),
            ));
        }

        Ok(UpdateProject {
            title: self.title.map(|t| t.trim().to_string()),
            description: self.description.map(|d| d.trim().to_string()),
            budget: self.budget,
            skills: self.skills.as_ref().map(SkillsInput::normalize),
            deadline: self.deadline,
            status: self.status,
        })
    }
}

/// Request body for `POST /projects/{id}/submit`.
#[derive(Debug, Deserialize)]
pub struct SubmitWorkRequest {
    pub link: String,
    #[serde(default)]
    pub note: String,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/projects?skills=a,b&status=open
pub async fn list(
    State(state): State<AppState>,
    RequireAuth(_auth): RequireAuth,
    Query(params): Query<ProjectListParams>,
) -> AppResult<Json<Vec<ProjectDetail>>> {
    let projects = ProjectRepo::list(&state.pool, &params.into_filter()).await?;
    Ok(Json(with_people(&state.pool, projects).await?))
}

/// POST /api/v1/projects
pub async fn create(
    State(state): State<AppState>,
    RequireClient(auth): RequireClient,
    Json(input): Json<CreateProjectRequest>,
) -> AppResult<(StatusCode, Json<Project>)> {
    validate_title(&input.title)?;
    validate_description(&input.description)?;
    validate_budget(input.budget)?;

    let create = CreateProject {
        client_id: auth.user_id,
        title: input.title.trim().to_string(),
        description: input.description.trim().to_string(),
        budget: input.budget,
        skills: input
            .skills
            .as_ref()
            .map(SkillsInput::normalize)
            .unwrap_or_default(),
        deadline: input.deadline,
    };
    let project = ProjectRepo::create(&state.pool, &create).await?;

    state.publish(
        project_event(PROJECT_CREATED, &project, auth.user_id)
            .with_payload(serde_json::json!({ "title": project.title, "budget": project.budget })),
    );
    Ok((StatusCode::CREATED, Json(project)))
}

/// GET /api/v1/projects/mine
///
/// Clients see the projects they posted, freelancers the projects assigned
/// to them. Admins own none.
pub async fn mine(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<Vec<ProjectDetail>>> {
    let projects = match auth.role {
        Role::Client => ProjectRepo::list_by_client(&state.pool, auth.user_id).await?,
        Role::Freelancer => ProjectRepo::list_by_freelancer(&state.pool, auth.user_id).await?,
        Role::Admin => Vec::new(),
    };
    Ok(Json(with_people(&state.pool, projects).await?))
}

/// GET /api/v1/projects/stats
pub async fn stats(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> AppResult<Json<ProjectStats>> {
    Ok(Json(ProjectRepo::stats(&state.pool).await?))
}

/// GET /api/v1/projects/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    RequireAuth(_auth): RequireAuth,
    Path(id): Path<DbId>,
) -> AppResult<Json<ProjectDetail>> {
    let project = find_project(&state.pool, id).await?;
    let people =
        UserRepo::summaries(&state.pool, &referenced_users(std::slice::from_ref(&project))).await?;
    Ok(Json(ProjectDetail::new(project, &people)))
}

/// PUT /api/v1/projects/{id}
///
/// Owner client or admin. The status cannot be changed through this route.
pub async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateProjectRequest>,
) -> AppResult<Json<Project>> {
    let current = find_project(&state.pool, id).await?;
    auth.caller().require_owner_or_admin(current.client_id, "project")?;

    let patch = input.into_patch(false)?;
    apply_update(&state, auth.caller(), &current, &patch)
        .await
        .map(Json)
}

/// DELETE /api/v1/projects/{id}
///
/// Owner client or admin. Applications are removed with the project.
pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let current = find_project(&state.pool, id).await?;
    auth.caller().require_owner_or_admin(current.client_id, "project")?;

    delete_cascade(&state, auth.caller(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/projects/{id}/submit
///
/// The assigned freelancer delivers the work. The project completes and its
/// budget is credited to the freelancer.
pub async fn submit_work(
    State(state): State<AppState>,
    RequireFreelancer(auth): RequireFreelancer,
    Path(id): Path<DbId>,
    Json(input): Json<SubmitWorkRequest>,
) -> AppResult<Json<Project>> {
    let link = input.link.trim();
    if link.is_empty() {
        return Err(CoreError::Validation("Submission link is required".into()).into());
    }

    let project =
        ProjectRepo::submit_work(&state.pool, &auth.caller(), id, link, input.note.trim()).await?;

    tracing::info!(project_id = id, freelancer_id = auth.user_id, "Project completed");
    state.publish(
        project_event(PROJECT_COMPLETED, &project, auth.user_id).with_payload(serde_json::json!({
            "freelancer_id": auth.user_id,
            "amount": project.budget,
            "link": link,
        })),
    );
    Ok(Json(project))
}

/// POST /api/v1/projects/{id}/opt-out
///
/// The assigned freelancer gives the project back. It reopens and their
/// accepted application is voided.
pub async fn opt_out(
    State(state): State<AppState>,
    RequireFreelancer(auth): RequireFreelancer,
    Path(id): Path<DbId>,
) -> AppResult<Json<Project>> {
    let outcome = ProjectRepo::opt_out(&state.pool, &auth.caller(), id).await?;

    tracing::info!(project_id = id, freelancer_id = auth.user_id, "Freelancer opted out");
    state.publish(
        project_event(PROJECT_REOPENED, &outcome.project, auth.user_id).with_payload(
            serde_json::json!({
                "freelancer_id": auth.user_id,
                "voided_application_ids": outcome.voided_application_ids,
            }),
        ),
    );
    Ok(Json(outcome.project))
}

/// GET /api/v1/projects/{id}/applications
///
/// Owner client or admin.
pub async fn list_applications(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<Vec<Application>>> {
    let project = find_project(&state.pool, id).await?;
    auth.caller()
        .require_owner_or_admin(project.client_id, "project")?;

    Ok(Json(ApplicationRepo::list_for_project(&state.pool, id).await?))
}

// ---------------------------------------------------------------------------
// Shared with the admin handlers
// ---------------------------------------------------------------------------

pub(crate) async fn find_project(pool: &DbPool, id: DbId) -> AppResult<Project> {
    ProjectRepo::find_by_id(pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id,
        }))
}

/// Resolve client and freelancer display fields in one lookup.
pub(crate) async fn with_people(
    pool: &DbPool,
    projects: Vec<Project>,
) -> AppResult<Vec<ProjectDetail>> {
    let people = UserRepo::summaries(pool, &referenced_users(&projects)).await?;
    Ok(projects
        .into_iter()
        .map(|project| ProjectDetail::new(project, &people))
        .collect())
}

/// Apply an already-authorized patch to `current` and announce it.
///
/// When the patch unassigns the freelancer the event names them as
/// `released_freelancer_id` so their live connections leave the room.
pub(crate) async fn apply_update(
    state: &AppState,
    caller: Caller,
    current: &Project,
    patch: &UpdateProject,
) -> AppResult<Project> {
    let id = current.id;
    let project = ProjectRepo::update(&state.pool, id, patch)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id,
        }))?;
    let released = current
        .freelancer_id
        .filter(|previous| project.freelancer_id != Some(*previous));

    state.publish(
        project_event(PROJECT_UPDATED, &project, caller.user_id).with_payload(serde_json::json!({
            "status": project.status,
            "freelancer_id": project.freelancer_id,
            "released_freelancer_id": released,
        })),
    );
    Ok(project)
}

/// Delete an already-authorized project with its applications and announce it.
pub(crate) async fn delete_cascade(state: &AppState, caller: Caller, id: DbId) -> AppResult<()> {
    let deleted = ProjectRepo::delete(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id,
        }))?;

    tracing::info!(
        project_id = id,
        applications_removed = deleted.applications_removed,
        "Project deleted"
    );
    state.publish(
        project_event(PROJECT_DELETED, &deleted.project, caller.user_id).with_payload(
            serde_json::json!({ "applications_removed": deleted.applications_removed }),
        ),
    );
    Ok(())
}

fn project_event(event_type: &str, project: &Project, actor: DbId) -> PlatformEvent {
    PlatformEvent::new(event_type)
        .with_source(ENTITY_PROJECT, project.id)
        .with_project(project.id)
        .with_actor(actor)
}
