//! Freelancer profile model and DTOs.

use gigboard_core::types::{Amount, DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `freelancer_profiles` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct FreelancerProfile {
    pub user_id: DbId,
    pub bio: String,
    pub skills: Vec<String>,
    /// Projects this freelancer has been assigned, in assignment order.
    pub project_ids: Vec<DbId>,
    /// Applications this freelancer has filed, in filing order.
    pub application_ids: Vec<DbId>,
    pub funds: Amount,
    pub completed_projects: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Explicit patch for the editable part of a profile.
#[derive(Debug, Clone, Default)]
pub struct UpdateProfile {
    pub bio: Option<String>,
    pub skills: Option<Vec<String>>,
}
