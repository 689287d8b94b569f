//! Repository for the `projects` table.

use gigboard_core::caller::Caller;
use gigboard_core::error::CoreError;
use gigboard_core::project::ProjectStatus;
use gigboard_core::types::DbId;
use sqlx::types::Json;
use sqlx::{PgPool, Postgres, Transaction};

use crate::error::CascadeError;
use crate::models::project::{
    CreateProject, DeletedProject, OptOutOutcome, Project, ProjectFilter, Submission,
    UpdateProject,
};
use crate::models::stats::ProjectStats;
use crate::repositories::{ApplicationRepo, FreelancerRepo};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, client_id, title, description, budget, skills, status, \
                       freelancer_id, bids, deadline, submission, posted_at, updated_at";

/// Provides CRUD and lifecycle operations for projects.
pub struct ProjectRepo;

impl ProjectRepo {
    /// Insert a new project, returning the created row. New projects are
    /// open, unassigned and have an empty bid log.
    pub async fn create(pool: &PgPool, input: &CreateProject) -> Result<Project, sqlx::Error> {
        let query = format!(
            "INSERT INTO projects (client_id, title, description, budget, skills, deadline)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(input.client_id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.budget)
            .bind(&input.skills)
            .bind(input.deadline)
            .fetch_one(pool)
            .await
    }

    /// Find a project by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects WHERE id = $1");
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List projects matching the filter, newest first.
    pub async fn list(pool: &PgPool, filter: &ProjectFilter) -> Result<Vec<Project>, sqlx::Error> {
        let skills = (!filter.skills.is_empty()).then_some(&filter.skills);
        let query = format!(
            "SELECT {COLUMNS} FROM projects
             WHERE ($1::text[] IS NULL OR skills && $1)
               AND ($2::text IS NULL OR status = $2)
             ORDER BY posted_at DESC, id DESC"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(skills)
            .bind(filter.status.map(ProjectStatus::as_str))
            .fetch_all(pool)
            .await
    }

    /// Projects owned by a client, newest first.
    pub async fn list_by_client(
        pool: &PgPool,
        client_id: DbId,
    ) -> Result<Vec<Project>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM projects WHERE client_id = $1 ORDER BY posted_at DESC, id DESC"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(client_id)
            .fetch_all(pool)
            .await
    }

    /// Projects currently assigned to a freelancer, newest first.
    pub async fn list_by_freelancer(
        pool: &PgPool,
        freelancer_id: DbId,
    ) -> Result<Vec<Project>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM projects WHERE freelancer_id = $1 \
             ORDER BY posted_at DESC, id DESC"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(freelancer_id)
            .fetch_all(pool)
            .await
    }

    /// Apply a patch. Only present fields are written.
    ///
    /// A status change is validated against the current assignment under the
    /// row lock. Moving an assigned project back to `open` releases the
    /// freelancer and voids their accepted application, same as an opt-out.
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateProject,
    ) -> Result<Option<Project>, CascadeError> {
        let mut tx = pool.begin().await?;

        let Some(current) = Self::lock(&mut tx, id).await? else {
            return Ok(None);
        };

        let assignment = match input.status {
            Some(status) => current.assignment().with_status(status)?,
            None => current.assignment(),
        };
        if assignment.freelancer_id.is_none() && current.freelancer_id.is_some() {
            ApplicationRepo::void_accepted(&mut tx, id).await?;
        }

        let query = format!(
            "UPDATE projects SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                budget = COALESCE($4, budget),
                skills = COALESCE($5, skills),
                deadline = CASE WHEN $6 THEN $7 ELSE deadline END,
                status = $8,
                freelancer_id = $9
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let project = sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.budget)
            .bind(&input.skills)
            .bind(input.deadline.is_some())
            .bind(input.deadline.flatten())
            .bind(assignment.status.as_str())
            .bind(assignment.freelancer_id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some(project))
    }

    /// Delete a project and every application filed against it.
    ///
    /// Applications are removed before the project, inside one transaction.
    /// Returns `None` if no row with the given `id` exists.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<Option<DeletedProject>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let Some(project) = Self::lock(&mut tx, id).await? else {
            return Ok(None);
        };

        let applications_removed = ApplicationRepo::delete_for_project(&mut tx, id).await?;

        sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some(DeletedProject {
            project,
            applications_removed,
        }))
    }

    /// Record the assigned freelancer's delivery and complete the project.
    ///
    /// Credits the project budget to the freelancer's funds and bumps their
    /// completed counter in the same transaction, so settlement happens
    /// exactly once per project.
    pub async fn submit_work(
        pool: &PgPool,
        caller: &Caller,
        id: DbId,
        link: &str,
        note: &str,
    ) -> Result<Project, CascadeError> {
        let mut tx = pool.begin().await?;

        let current = Self::lock(&mut tx, id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Project",
                id,
            })?;
        let next = current.assignment().complete(caller)?;

        let submission = Submission {
            link: link.to_string(),
            note: note.to_string(),
            submitted_at: chrono::Utc::now(),
        };

        let query = format!(
            "UPDATE projects SET status = $2, submission = $3
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let project = sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(next.status.as_str())
            .bind(Json(&submission))
            .fetch_one(&mut *tx)
            .await?;

        FreelancerRepo::increment_funds(&mut *tx, caller.user_id, project.budget).await?;
        FreelancerRepo::increment_completed(&mut *tx, caller.user_id).await?;

        tx.commit().await?;
        tracing::debug!(
            project_id = id,
            freelancer_id = caller.user_id,
            amount = project.budget,
            "Work submitted and funds credited"
        );
        Ok(project)
    }

    /// The assigned freelancer gives up the project: it reopens and their
    /// accepted application is voided so a new bid can be accepted.
    pub async fn opt_out(
        pool: &PgPool,
        caller: &Caller,
        id: DbId,
    ) -> Result<OptOutOutcome, CascadeError> {
        let mut tx = pool.begin().await?;

        let current = Self::lock(&mut tx, id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Project",
                id,
            })?;
        let next = current.assignment().reopen(caller)?;

        let voided_application_ids = ApplicationRepo::void_accepted(&mut tx, id).await?;
        let project = Self::set_assignment(&mut tx, id, next.status, next.freelancer_id).await?;

        tx.commit().await?;
        Ok(OptOutOutcome {
            project,
            voided_application_ids,
        })
    }

    /// Count projects by status.
    pub async fn stats(pool: &PgPool) -> Result<ProjectStats, sqlx::Error> {
        sqlx::query_as::<_, ProjectStats>(
            "SELECT
                COUNT(*) AS total,
                COUNT(*) FILTER (WHERE status = 'open') AS open,
                COUNT(*) FILTER (WHERE status = 'in-progress') AS in_progress,
                COUNT(*) FILTER (WHERE status = 'completed') AS completed
             FROM projects",
        )
        .fetch_one(pool)
        .await
    }

    // -----------------------------------------------------------------------
    // Transaction helpers
    // -----------------------------------------------------------------------

    /// Load a project and hold its row lock until the transaction ends.
    pub(crate) async fn lock(
        tx: &mut Transaction<'_, Postgres>,
        id: DbId,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects WHERE id = $1 FOR UPDATE");
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .fetch_optional(&mut **tx)
            .await
    }

    /// Append an entry to the bid log.
    pub(crate) async fn append_bid(
        tx: &mut Transaction<'_, Postgres>,
        id: DbId,
        freelancer_id: DbId,
        amount: f64,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE projects SET bids = bids || jsonb_build_array(
                jsonb_build_object('freelancer_id', $2::bigint, 'amount', $3::float8))
             WHERE id = $1",
        )
        .bind(id)
        .bind(freelancer_id)
        .bind(amount)
        .execute(&mut **tx)
        .await?;
        Ok(())
    }

    /// Write a new (status, freelancer) pair to a locked project.
    pub(crate) async fn set_assignment(
        tx: &mut Transaction<'_, Postgres>,
        id: DbId,
        status: ProjectStatus,
        freelancer_id: Option<DbId>,
    ) -> Result<Project, sqlx::Error> {
        let query = format!(
            "UPDATE projects SET status = $2, freelancer_id = $3
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(status.as_str())
            .bind(freelancer_id)
            .fetch_one(&mut **tx)
            .await
    }
}
