//! Handlers for the `/applications` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use gigboard_core::application::{validate_bid, validate_proposal};
use gigboard_core::types::{Amount, DbId};
use gigboard_db::models::application::{Application, CreateApplication};
use gigboard_db::models::project::Project;
use gigboard_db::models::stats::ApplicationStats;
use gigboard_db::repositories::ApplicationRepo;
use gigboard_events::types::{
    APPLICATION_ACCEPTED, APPLICATION_REJECTED, APPLICATION_SUBMITTED, ENTITY_APPLICATION,
    ENTITY_PROJECT, PROJECT_ASSIGNED,
};
use gigboard_events::PlatformEvent;
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::middleware::rbac::{RequireAdmin, RequireClient, RequireFreelancer};
use crate::state::AppState;

/// Request body for `POST /applications`.
#[derive(Debug, Deserialize)]
pub struct CreateApplicationRequest {
    pub project_id: DbId,
    pub proposal: String,
    pub bid: Amount,
}

/// Response for `POST /applications/{id}/accept`.
#[derive(Debug, Serialize)]
pub struct AcceptResponse {
    pub application: Application,
    pub project: Project,
    pub rejected_application_ids: Vec<DbId>,
}

/// POST /api/v1/applications
pub async fn submit(
    State(state): State<AppState>,
    RequireFreelancer(auth): RequireFreelancer,
    Json(input): Json<CreateApplicationRequest>,
) -> AppResult<(StatusCode, Json<Application>)> {
    validate_proposal(&input.proposal)?;
    validate_bid(input.bid)?;

    let create = CreateApplication {
        project_id: input.project_id,
        proposal: input.proposal.trim().to_string(),
        bid: input.bid,
    };
    let application = ApplicationRepo::submit(&state.pool, &auth.caller(), &create).await?;

    state.publish(
        application_event(APPLICATION_SUBMITTED, &application, auth.user_id).with_payload(
            serde_json::json!({
                "freelancer_id": application.freelancer_id,
                "bid": application.bid,
            }),
        ),
    );
    Ok((StatusCode::CREATED, Json(application)))
}

/// GET /api/v1/applications/mine
pub async fn mine(
    State(state): State<AppState>,
    RequireFreelancer(auth): RequireFreelancer,
) -> AppResult<Json<Vec<Application>>> {
    let applications = ApplicationRepo::list_by_freelancer(&state.pool, auth.user_id).await?;
    Ok(Json(applications))
}

/// GET /api/v1/applications/stats
pub async fn stats(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> AppResult<Json<ApplicationStats>> {
    Ok(Json(ApplicationRepo::stats(&state.pool).await?))
}

/// POST /api/v1/applications/{id}/accept
///
/// The owning client picks this bid. Pending siblings are rejected and the
/// project is assigned, all in one transaction.
pub async fn accept(
    State(state): State<AppState>,
    RequireClient(auth): RequireClient,
    Path(id): Path<DbId>,
) -> AppResult<Json<AcceptResponse>> {
    let outcome = ApplicationRepo::accept(&state.pool, &auth.caller(), id).await?;

    tracing::info!(
        application_id = id,
        project_id = outcome.project.id,
        freelancer_id = outcome.application.freelancer_id,
        "Application accepted"
    );
    state.publish(
        application_event(APPLICATION_ACCEPTED, &outcome.application, auth.user_id)
            .with_payload(serde_json::json!({
                "freelancer_id": outcome.application.freelancer_id,
                "rejected_application_ids": outcome.rejected_ids,
            })),
    );
    state.publish(
        PlatformEvent::new(PROJECT_ASSIGNED)
            .with_source(ENTITY_PROJECT, outcome.project.id)
            .with_project(outcome.project.id)
            .with_actor(auth.user_id)
            .with_payload(serde_json::json!({
                "freelancer_id": outcome.project.freelancer_id,
                "application_id": id,
            })),
    );

    Ok(Json(AcceptResponse {
        application: outcome.application,
        project: outcome.project,
        rejected_application_ids: outcome.rejected_ids,
    }))
}

/// POST /api/v1/applications/{id}/reject
pub async fn reject(
    State(state): State<AppState>,
    RequireClient(auth): RequireClient,
    Path(id): Path<DbId>,
) -> AppResult<Json<Application>> {
    let application = ApplicationRepo::reject(&state.pool, &auth.caller(), id).await?;

    state.publish(
        application_event(APPLICATION_REJECTED, &application, auth.user_id).with_payload(
            serde_json::json!({ "freelancer_id": application.freelancer_id }),
        ),
    );
    Ok(Json(application))
}

fn application_event(event_type: &str, application: &Application, actor: DbId) -> PlatformEvent {
    PlatformEvent::new(event_type)
        .with_source(ENTITY_APPLICATION, application.id)
        .with_project(application.project_id)
        .with_actor(actor)
}
