//! Application (bid) entity model and DTOs.

use gigboard_core::application::ApplicationStatus;
use gigboard_core::types::{Amount, DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

use crate::models::project::Project;

/// A row from the `applications` table.
///
/// `client_id` and the `project_*` columns are a snapshot of the project
/// taken when the application was filed.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Application {
    pub id: DbId,
    pub project_id: DbId,
    pub client_id: DbId,
    pub freelancer_id: DbId,
    pub proposal: String,
    pub bid: Amount,
    pub project_title: String,
    pub project_description: String,
    pub project_skills: Vec<String>,
    #[sqlx(try_from = "String")]
    pub status: ApplicationStatus,
    pub applied_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for filing an application. The freelancer comes from the caller.
#[derive(Debug, Clone)]
pub struct CreateApplication {
    pub project_id: DbId,
    pub proposal: String,
    pub bid: Amount,
}

/// Result of accepting an application.
#[derive(Debug, Clone)]
pub struct AcceptOutcome {
    pub application: Application,
    pub project: Project,
    /// Siblings moved from `pending` to `rejected` by the cascade.
    pub rejected_ids: Vec<DbId>,
}
