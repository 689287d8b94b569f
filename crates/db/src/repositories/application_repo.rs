//! Repository for the `applications` table.

use gigboard_core::application::{
    ensure_can_apply, ensure_can_decide, plan_acceptance, ApplicationStatus,
};
use gigboard_core::caller::Caller;
use gigboard_core::error::CoreError;
use gigboard_core::types::DbId;
use sqlx::{PgPool, Postgres, Transaction};

use crate::error::CascadeError;
use crate::models::application::{AcceptOutcome, Application, CreateApplication};
use crate::models::stats::ApplicationStats;
use crate::repositories::{FreelancerRepo, ProjectRepo};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, project_id, client_id, freelancer_id, proposal, bid, \
                       project_title, project_description, project_skills, status, \
                       applied_at, updated_at";

/// Provides operations on applications, including the acceptance cascade.
pub struct ApplicationRepo;

impl ApplicationRepo {
    /// File an application for the calling freelancer.
    ///
    /// Under the project row lock: the project must be open and the caller
    /// must not have applied before. The application row, the project's bid
    /// log entry and the profile's application list are written together.
    pub async fn submit(
        pool: &PgPool,
        caller: &Caller,
        input: &CreateApplication,
    ) -> Result<Application, CascadeError> {
        let mut tx = pool.begin().await?;

        let project = ProjectRepo::lock(&mut tx, input.project_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Project",
                id: input.project_id,
            })?;
        ensure_can_apply(caller, project.client_id)?;
        project.assignment().ensure_open()?;

        let duplicate: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM applications WHERE project_id = $1 AND freelancer_id = $2)",
        )
        .bind(project.id)
        .bind(caller.user_id)
        .fetch_one(&mut *tx)
        .await?;
        if duplicate {
            return Err(CoreError::Conflict(
                "You have already applied to this project".into(),
            )
            .into());
        }

        let query = format!(
            "INSERT INTO applications
                (project_id, client_id, freelancer_id, proposal, bid,
                 project_title, project_description, project_skills)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {COLUMNS}"
        );
        let application = sqlx::query_as::<_, Application>(&query)
            .bind(project.id)
            .bind(project.client_id)
            .bind(caller.user_id)
            .bind(&input.proposal)
            .bind(input.bid)
            .bind(&project.title)
            .bind(&project.description)
            .bind(&project.skills)
            .fetch_one(&mut *tx)
            .await?;

        ProjectRepo::append_bid(&mut tx, project.id, caller.user_id, input.bid).await?;
        FreelancerRepo::append_application(&mut *tx, caller.user_id, application.id).await?;

        tx.commit().await?;
        Ok(application)
    }

    /// Accept an application and resolve the project.
    ///
    /// Locks the project first, then every application filed against it.
    /// The chosen application becomes `accepted`, every pending sibling
    /// `rejected`, the project moves to `in-progress` with the freelancer
    /// assigned, and the project id is appended to the freelancer's profile.
    pub async fn accept(
        pool: &PgPool,
        caller: &Caller,
        id: DbId,
    ) -> Result<AcceptOutcome, CascadeError> {
        let project_id = Self::find_by_id(pool, id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Application",
                id,
            })?
            .project_id;

        let mut tx = pool.begin().await?;

        let project = ProjectRepo::lock(&mut tx, project_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Project",
                id: project_id,
            })?;
        let application = Self::lock(&mut tx, id).await?.ok_or(CoreError::NotFound {
            entity: "Application",
            id,
        })?;
        ensure_can_decide(caller, application.client_id, application.status)?;
        let assignment = project.assignment().assign(application.freelancer_id)?;

        let siblings: Vec<(DbId, String)> = sqlx::query_as(
            "SELECT id, status FROM applications WHERE project_id = $1 ORDER BY id FOR UPDATE",
        )
        .bind(project_id)
        .fetch_all(&mut *tx)
        .await?;
        let siblings = siblings
            .into_iter()
            .map(|(sibling_id, status)| Ok((sibling_id, status.parse::<ApplicationStatus>()?)))
            .collect::<Result<Vec<_>, CoreError>>()?;
        let plan = plan_acceptance(id, &siblings)?;

        if !plan.rejected.is_empty() {
            sqlx::query("UPDATE applications SET status = $2 WHERE id = ANY($1)")
                .bind(&plan.rejected)
                .bind(ApplicationStatus::Rejected.as_str())
                .execute(&mut *tx)
                .await?;
        }
        let application =
            Self::set_status(&mut tx, plan.accepted, ApplicationStatus::Accepted).await?;

        let project = ProjectRepo::set_assignment(
            &mut tx,
            project_id,
            assignment.status,
            assignment.freelancer_id,
        )
        .await?;
        FreelancerRepo::append_project(&mut *tx, application.freelancer_id, project_id).await?;

        tx.commit().await?;
        tracing::debug!(
            application_id = id,
            project_id,
            rejected = plan.rejected.len(),
            "Application accepted"
        );
        Ok(AcceptOutcome {
            application,
            project,
            rejected_ids: plan.rejected,
        })
    }

    /// Reject a pending application. The project is not touched.
    pub async fn reject(
        pool: &PgPool,
        caller: &Caller,
        id: DbId,
    ) -> Result<Application, CascadeError> {
        let mut tx = pool.begin().await?;

        let application = Self::lock(&mut tx, id).await?.ok_or(CoreError::NotFound {
            entity: "Application",
            id,
        })?;
        ensure_can_decide(caller, application.client_id, application.status)?;
        let application = Self::set_status(&mut tx, id, ApplicationStatus::Rejected).await?;

        tx.commit().await?;
        Ok(application)
    }

    /// Find an application by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Application>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM applications WHERE id = $1");
        sqlx::query_as::<_, Application>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Applications filed against a project, oldest first.
    pub async fn list_for_project(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<Application>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM applications WHERE project_id = $1 ORDER BY applied_at, id"
        );
        sqlx::query_as::<_, Application>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    /// Applications filed by a freelancer, newest first.
    pub async fn list_by_freelancer(
        pool: &PgPool,
        freelancer_id: DbId,
    ) -> Result<Vec<Application>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM applications WHERE freelancer_id = $1 \
             ORDER BY applied_at DESC, id DESC"
        );
        sqlx::query_as::<_, Application>(&query)
            .bind(freelancer_id)
            .fetch_all(pool)
            .await
    }

    /// Every application on the platform, newest first.
    pub async fn list_all(pool: &PgPool) -> Result<Vec<Application>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM applications ORDER BY applied_at DESC, id DESC");
        sqlx::query_as::<_, Application>(&query).fetch_all(pool).await
    }

    /// Count applications by status.
    pub async fn stats(pool: &PgPool) -> Result<ApplicationStats, sqlx::Error> {
        sqlx::query_as::<_, ApplicationStats>(
            "SELECT
                COUNT(*) AS total,
                COUNT(*) FILTER (WHERE status = 'pending') AS pending,
                COUNT(*) FILTER (WHERE status = 'accepted') AS accepted,
                COUNT(*) FILTER (WHERE status = 'rejected') AS rejected
             FROM applications",
        )
        .fetch_one(pool)
        .await
    }

    // -----------------------------------------------------------------------
    // Transaction helpers
    // -----------------------------------------------------------------------

    async fn lock(
        tx: &mut Transaction<'_, Postgres>,
        id: DbId,
    ) -> Result<Option<Application>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM applications WHERE id = $1 FOR UPDATE");
        sqlx::query_as::<_, Application>(&query)
            .bind(id)
            .fetch_optional(&mut **tx)
            .await
    }

    async fn set_status(
        tx: &mut Transaction<'_, Postgres>,
        id: DbId,
        status: ApplicationStatus,
    ) -> Result<Application, sqlx::Error> {
        let query = format!("UPDATE applications SET status = $2 WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Application>(&query)
            .bind(id)
            .bind(status.as_str())
            .fetch_one(&mut **tx)
            .await
    }

    /// Move the project's accepted application (if any) to `rejected`.
    /// Returns the ids that changed.
    pub(crate) async fn void_accepted(
        tx: &mut Transaction<'_, Postgres>,
        project_id: DbId,
    ) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar(
            "UPDATE applications SET status = $2
             WHERE project_id = $1 AND status = $3
             RETURNING id",
        )
        .bind(project_id)
        .bind(ApplicationStatus::Rejected.as_str())
        .bind(ApplicationStatus::Accepted.as_str())
        .fetch_all(&mut **tx)
        .await
    }

    /// Remove every application filed against a project. Returns the count.
    pub(crate) async fn delete_for_project(
        tx: &mut Transaction<'_, Postgres>,
        project_id: DbId,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM applications WHERE project_id = $1")
            .bind(project_id)
            .execute(&mut **tx)
            .await?;
        Ok(result.rows_affected())
    }
}
