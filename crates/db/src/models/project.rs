//! Project entity model and DTOs.

use std::collections::HashMap;

use gigboard_core::project::{Assignment, ProjectStatus};
use gigboard_core::types::{Amount, DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;

use crate::models::user::UserSummary;

/// A row from the `projects` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Project {
    pub id: DbId,
    pub client_id: DbId,
    pub title: String,
    pub description: String,
    pub budget: Amount,
    pub skills: Vec<String>,
    #[sqlx(try_from = "String")]
    pub status: ProjectStatus,
    pub freelancer_id: Option<DbId>,
    pub bids: Json<Vec<Bid>>,
    pub deadline: Option<Timestamp>,
    pub submission: Option<Json<Submission>>,
    pub posted_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Project {
    pub fn assignment(&self) -> Assignment {
        Assignment::new(self.status, self.freelancer_id)
    }
}

/// A project with its client and assigned freelancer resolved for display.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectDetail {
    #[serde(flatten)]
    pub project: Project,
    pub client: Option<UserSummary>,
    pub freelancer: Option<UserSummary>,
}

impl ProjectDetail {
    /// Attach display fields from `people`. Ids missing from the map stay
    /// `None`.
    pub fn new(project: Project, people: &HashMap<DbId, UserSummary>) -> Self {
        let client = people.get(&project.client_id).cloned();
        let freelancer = project
            .freelancer_id
            .and_then(|id| people.get(&id))
            .cloned();
        Self {
            project,
            client,
            freelancer,
        }
    }
}

/// Every user a set of projects refers to, deduplicated.
pub fn referenced_users(projects: &[Project]) -> Vec<DbId> {
    let mut ids: Vec<DbId> = projects
        .iter()
        .flat_map(|p| std::iter::once(p.client_id).chain(p.freelancer_id))
        .collect();
    ids.sort_unstable();
    ids.dedup();
    ids
}

/// One entry in a project's informational bid log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bid {
    pub freelancer_id: DbId,
    pub amount: Amount,
}

/// Delivered work recorded when the freelancer submits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Submission {
    pub link: String,
    pub note: String,
    pub submitted_at: Timestamp,
}

/// DTO for creating a new project. Fields are already validated and skills
/// normalized.
#[derive(Debug, Clone)]
pub struct CreateProject {
    pub client_id: DbId,
    pub title: String,
    pub description: String,
    pub budget: Amount,
    pub skills: Vec<String>,
    pub deadline: Option<Timestamp>,
}

/// Explicit patch for a project.
///
/// `None` leaves a field unchanged. `deadline: Some(None)` clears the
/// deadline. `status` is only set by admins and goes through
/// [`Assignment::with_status`].
#[derive(Debug, Clone, Default)]
pub struct UpdateProject {
    pub title: Option<String>,
    pub description: Option<String>,
    pub budget: Option<Amount>,
    pub skills: Option<Vec<String>>,
    pub deadline: Option<Option<Timestamp>>,
    pub status: Option<ProjectStatus>,
}

/// Listing filter. An empty skill list matches every project; otherwise a
/// project matches when it shares at least one skill.
#[derive(Debug, Clone, Default)]
pub struct ProjectFilter {
    pub skills: Vec<String>,
    pub status: Option<ProjectStatus>,
}

/// Result of a cascading project delete.
#[derive(Debug, Clone)]
pub struct DeletedProject {
    pub project: Project,
    pub applications_removed: u64,
}

/// Result of opting out of a project.
#[derive(Debug, Clone)]
pub struct OptOutOutcome {
    pub project: Project,
    /// The opting-out freelancer's application, voided to `rejected`.
    pub voided_application_ids: Vec<DbId>,
}
