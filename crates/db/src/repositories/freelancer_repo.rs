//! Repository for the `freelancer_profiles` table.
//!
//! Every method takes a generic executor so the same query runs against the
//! pool or inside a cascade's transaction (`&mut *tx`).

use gigboard_core::types::{Amount, DbId};
use sqlx::PgExecutor;

use crate::models::freelancer::{FreelancerProfile, UpdateProfile};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "user_id, bio, skills, project_ids, application_ids, funds, \
                       completed_projects, created_at, updated_at";

/// Provides operations on freelancer profiles.
pub struct FreelancerRepo;

impl FreelancerRepo {
    /// Insert an empty profile. A second call for the same user is a no-op.
    pub async fn create<'e>(
        executor: impl PgExecutor<'e>,
        user_id: DbId,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO freelancer_profiles (user_id) VALUES ($1) ON CONFLICT (user_id) DO NOTHING",
        )
        .bind(user_id)
        .execute(executor)
        .await?;
        Ok(())
    }

    pub async fn get_profile<'e>(
        executor: impl PgExecutor<'e>,
        user_id: DbId,
    ) -> Result<Option<FreelancerProfile>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM freelancer_profiles WHERE user_id = $1");
        sqlx::query_as::<_, FreelancerProfile>(&query)
            .bind(user_id)
            .fetch_optional(executor)
            .await
    }

    /// Apply the present fields of `input`. Returns `None` if the user has
    /// no profile.
    pub async fn set_profile<'e>(
        executor: impl PgExecutor<'e>,
        user_id: DbId,
        input: &UpdateProfile,
    ) -> Result<Option<FreelancerProfile>, sqlx::Error> {
        let query = format!(
            "UPDATE freelancer_profiles SET
                bio = COALESCE($2, bio),
                skills = COALESCE($3, skills)
             WHERE user_id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, FreelancerProfile>(&query)
            .bind(user_id)
            .bind(&input.bio)
            .bind(&input.skills)
            .fetch_optional(executor)
            .await
    }

    /// Credit the funds ledger. Returns `true` if a profile was updated.
    pub async fn increment_funds<'e>(
        executor: impl PgExecutor<'e>,
        user_id: DbId,
        amount: Amount,
    ) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("UPDATE freelancer_profiles SET funds = funds + $2 WHERE user_id = $1")
                .bind(user_id)
                .bind(amount)
                .execute(executor)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn increment_completed<'e>(
        executor: impl PgExecutor<'e>,
        user_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE freelancer_profiles SET completed_projects = completed_projects + 1 \
             WHERE user_id = $1",
        )
        .bind(user_id)
        .execute(executor)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn append_project<'e>(
        executor: impl PgExecutor<'e>,
        user_id: DbId,
        project_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE freelancer_profiles SET project_ids = array_append(project_ids, $2) \
             WHERE user_id = $1",
        )
        .bind(user_id)
        .bind(project_id)
        .execute(executor)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn append_application<'e>(
        executor: impl PgExecutor<'e>,
        user_id: DbId,
        application_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE freelancer_profiles SET application_ids = array_append(application_ids, $2) \
             WHERE user_id = $1",
        )
        .bind(user_id)
        .bind(application_id)
        .execute(executor)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
