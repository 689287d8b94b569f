//! Dashboard count aggregates.

use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, Default, FromRow, Serialize)]
pub struct ProjectStats {
    pub total: i64,
    pub open: i64,
    pub in_progress: i64,
    pub completed: i64,
}

#[derive(Debug, Clone, Default, FromRow, Serialize)]
pub struct ApplicationStats {
    pub total: i64,
    pub pending: i64,
    pub accepted: i64,
    pub rejected: i64,
}

#[derive(Debug, Clone, Default, FromRow, Serialize)]
pub struct UserStats {
    pub total: i64,
    pub freelancers: i64,
    pub clients: i64,
    pub admins: i64,
}

/// Platform-wide counts for the admin dashboard.
#[derive(Debug, Clone, Serialize)]
pub struct PlatformStats {
    pub users: UserStats,
    pub projects: ProjectStats,
    pub applications: ApplicationStats,
}
