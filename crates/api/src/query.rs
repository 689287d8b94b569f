//! Shared query parameter types for API handlers.

use gigboard_core::project::{normalize_skills, ProjectStatus, SKILL_DELIMITER};
use gigboard_db::models::project::ProjectFilter;
use serde::Deserialize;

/// Query parameters for project listing (`?skills=a,b&status=open`).
#[derive(Debug, Default, Deserialize)]
pub struct ProjectListParams {
    /// Comma-separated skill names; a project matches on any overlap.
    pub skills: Option<String>,
    pub status: Option<ProjectStatus>,
}

impl ProjectListParams {
    pub fn into_filter(self) -> ProjectFilter {
        ProjectFilter {
            skills: self
                .skills
                .as_deref()
                .map(|raw| normalize_skills(raw.split(SKILL_DELIMITER)))
                .unwrap_or_default(),
            status: self.status,
        }
    }
}

/// Pagination parameters (`?limit=&offset=`) for the audit log.
#[derive(Debug, Deserialize)]
pub struct PaginationParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl PaginationParams {
    pub const DEFAULT_LIMIT: i64 = 50;
    pub const MAX_LIMIT: i64 = 200;

    pub fn limit(&self) -> i64 {
        self.limit
            .unwrap_or(Self::DEFAULT_LIMIT)
            .clamp(1, Self::MAX_LIMIT)
    }

    pub fn offset(&self) -> i64 {
        self.offset.unwrap_or(0).max(0)
    }
}
