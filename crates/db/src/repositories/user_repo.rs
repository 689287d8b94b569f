//! Repository for the `users` table.

use std::collections::HashMap;

use gigboard_core::roles::Role;
use gigboard_core::types::DbId;
use sqlx::PgPool;

use crate::models::stats::UserStats;
use crate::models::user::{CreateUser, User, UserSummary};
use crate::repositories::FreelancerRepo;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, username, email, password_hash, role, created_at, updated_at";

/// Provides CRUD operations for users.
pub struct UserRepo;

impl UserRepo {
    /// Insert a new user, returning the created row.
    ///
    /// Freelancers get their empty profile in the same transaction.
    pub async fn create(pool: &PgPool, input: &CreateUser) -> Result<User, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO users (username, email, password_hash, role)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        let user = sqlx::query_as::<_, User>(&query)
            .bind(&input.username)
            .bind(&input.email)
            .bind(&input.password_hash)
            .bind(input.role.as_str())
            .fetch_one(&mut *tx)
            .await?;

        match user.role {
            Role::Freelancer => {
                FreelancerRepo::create(&mut *tx, user.id).await?;
            }
            Role::Client | Role::Admin => {}
        }

        tx.commit().await?;
        Ok(user)
    }

    /// Find a user by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a user by email (case-sensitive).
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE email = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    /// List all users ordered by most recently created first.
    pub async fn list(pool: &PgPool) -> Result<Vec<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users ORDER BY created_at DESC, id DESC");
        sqlx::query_as::<_, User>(&query).fetch_all(pool).await
    }

    /// Display fields for a set of users, keyed by id. Unknown ids are
    /// absent from the map.
    pub async fn summaries(
        pool: &PgPool,
        ids: &[DbId],
    ) -> Result<HashMap<DbId, UserSummary>, sqlx::Error> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let rows = sqlx::query_as::<_, UserSummary>(
            "SELECT id, username, email FROM users WHERE id = ANY($1)",
        )
        .bind(ids)
        .fetch_all(pool)
        .await?;
        Ok(rows.into_iter().map(|u| (u.id, u)).collect())
    }

    /// Number of projects currently assigned to this user as freelancer.
    pub async fn count_assignments(pool: &PgPool, id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM projects WHERE freelancer_id = $1")
            .bind(id)
            .fetch_one(pool)
            .await
    }

    /// Delete a user by ID. Owned projects, applications and the profile
    /// cascade. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Count users by role.
    pub async fn stats(pool: &PgPool) -> Result<UserStats, sqlx::Error> {
        sqlx::query_as::<_, UserStats>(
            "SELECT
                COUNT(*) AS total,
                COUNT(*) FILTER (WHERE role = 'freelancer') AS freelancers,
                COUNT(*) FILTER (WHERE role = 'client') AS clients,
                COUNT(*) FILTER (WHERE role = 'admin') AS admins
             FROM users",
        )
        .fetch_one(pool)
        .await
    }
}
