//! Handlers for the `/users` resource (own profile, freelancer profiles).

use axum::extract::{Path, State};
use axum::Json;
use gigboard_core::error::CoreError;
use gigboard_core::project::SkillsInput;
use gigboard_core::types::DbId;
use gigboard_db::models::freelancer::{FreelancerProfile, UpdateProfile};
use gigboard_db::models::user::UserResponse;
use gigboard_db::repositories::{FreelancerRepo, UserRepo};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::{RequireAuth, RequireFreelancer};
use crate::state::AppState;

/// Request body for `PUT /users/profile`. Absent fields are left unchanged.
#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub bio: Option<String>,
    pub skills: Option<SkillsInput>,
}

/// A user together with their freelancer profile, when they have one.
#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub user: UserResponse,
    pub freelancer_profile: Option<FreelancerProfile>,
}

/// GET /api/v1/users/profile
pub async fn get_profile(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<ProfileResponse>> {
    let user = UserRepo::find_by_id(&state.pool, auth.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: auth.user_id,
        }))?;
    let freelancer_profile = FreelancerRepo::get_profile(&state.pool, user.id).await?;

    Ok(Json(ProfileResponse {
        user: UserResponse::from(&user),
        freelancer_profile,
    }))
}

/// PUT /api/v1/users/profile
///
/// Update the caller's bio and skills. Freelancers only.
pub async fn update_profile(
    State(state): State<AppState>,
    RequireFreelancer(auth): RequireFreelancer,
    Json(input): Json<UpdateProfileRequest>,
) -> AppResult<Json<FreelancerProfile>> {
    let patch = UpdateProfile {
        bio: input.bio.map(|bio| bio.trim().to_string()),
        skills: input.skills.as_ref().map(SkillsInput::normalize),
    };

    let profile = FreelancerRepo::set_profile(&state.pool, auth.user_id, &patch)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "FreelancerProfile",
            id: auth.user_id,
        }))?;
    Ok(Json(profile))
}

/// GET /api/v1/users/freelancers/{user_id}
pub async fn get_freelancer(
    State(state): State<AppState>,
    RequireAuth(_auth): RequireAuth,
    Path(user_id): Path<DbId>,
) -> AppResult<Json<ProfileResponse>> {
    let not_found = || {
        AppError::Core(CoreError::NotFound {
            entity: "FreelancerProfile",
            id: user_id,
        })
    };

    let profile = FreelancerRepo::get_profile(&state.pool, user_id)
        .await?
        .ok_or_else(not_found)?;
    let user = UserRepo::find_by_id(&state.pool, user_id)
        .await?
        .ok_or_else(not_found)?;

    Ok(Json(ProfileResponse {
        user: UserResponse::from(&user),
        freelancer_profile: Some(profile),
    }))
}
