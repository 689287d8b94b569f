//! Integration tests for the project / application lifecycle.
//!
//! Exercises the repository cascades against a real database:
//! - Accepting an application (sibling rejection, assignment, profile update)
//! - Duplicate and late applications
//! - Work submission and fund settlement
//! - Opt-out and re-acceptance
//! - Cascade delete
//! - Chat history ordering

use assert_matches::assert_matches;
use chrono::{TimeZone, Utc};
use gigboard_core::application::ApplicationStatus;
use gigboard_core::caller::Caller;
use gigboard_core::error::CoreError;
use gigboard_core::project::ProjectStatus;
use gigboard_core::roles::Role;
use gigboard_db::models::application::{Application, CreateApplication};
use gigboard_db::models::message::CreateMessage;
use gigboard_db::models::project::{Bid, CreateProject, Project, ProjectFilter, UpdateProject};
use gigboard_db::models::user::CreateUser;
use gigboard_db::repositories::{
    ApplicationRepo, FreelancerRepo, MessageRepo, ProjectRepo, UserRepo,
};
use gigboard_db::CascadeError;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn new_user(pool: &PgPool, name: &str, role: Role) -> Caller {
    let user = UserRepo::create(
        pool,
        &CreateUser {
            username: name.to_string(),
            email: format!("{name}@example.com"),
            password_hash: "$argon2id$v=19$test".to_string(),
            role,
        },
    )
    .await
    .unwrap();
    Caller::new(user.id, role)
}

async fn new_project(pool: &PgPool, client: &Caller, budget: f64) -> Project {
    ProjectRepo::create(
        pool,
        &CreateProject {
            client_id: client.user_id,
            title: "Landing page".to_string(),
            description: "Marketing site for the launch".to_string(),
            budget,
            skills: vec!["React".to_string(), "Node".to_string()],
            deadline: None,
        },
    )
    .await
    .unwrap()
}

async fn apply(pool: &PgPool, freelancer: &Caller, project_id: i64, bid: f64) -> Application {
    try_apply(pool, freelancer, project_id, bid).await.unwrap()
}

async fn try_apply(
    pool: &PgPool,
    freelancer: &Caller,
    project_id: i64,
    bid: f64,
) -> Result<Application, CascadeError> {
    ApplicationRepo::submit(
        pool,
        freelancer,
        &CreateApplication {
            project_id,
            proposal: "I have shipped several of these".to_string(),
            bid,
        },
    )
    .await
}

async fn statuses(pool: &PgPool, project_id: i64) -> Vec<(i64, ApplicationStatus)> {
    ApplicationRepo::list_for_project(pool, project_id)
        .await
        .unwrap()
        .into_iter()
        .map(|a| (a.freelancer_id, a.status))
        .collect()
}

/// Scenario setup: client with a 5000 project, F1 bids 4500, F2 bids 4800.
struct Market {
    client: Caller,
    f1: Caller,
    f2: Caller,
    project: Project,
    app1: Application,
    app2: Application,
}

async fn market(pool: &PgPool) -> Market {
    let client = new_user(pool, "client", Role::Client).await;
    let f1 = new_user(pool, "f1", Role::Freelancer).await;
    let f2 = new_user(pool, "f2", Role::Freelancer).await;
    let project = new_project(pool, &client, 5000.0).await;
    let app1 = apply(pool, &f1, project.id, 4500.0).await;
    let app2 = apply(pool, &f2, project.id, 4800.0).await;
    Market {
        client,
        f1,
        f2,
        project,
        app1,
        app2,
    }
}

// ---------------------------------------------------------------------------
// Applying
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_apply_snapshots_project_and_logs_bid(pool: PgPool) {
    let m = market(&pool).await;

    assert_eq!(m.app1.status, ApplicationStatus::Pending);
    assert_eq!(m.app1.client_id, m.client.user_id);
    assert_eq!(m.app1.project_title, "Landing page");
    assert_eq!(m.app1.project_skills, vec!["React", "Node"]);

    let project = ProjectRepo::find_by_id(&pool, m.project.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(project.status, ProjectStatus::Open);
    assert_eq!(project.budget, 5000.0);
    assert_eq!(
        project.bids.0,
        vec![
            Bid {
                freelancer_id: m.f1.user_id,
                amount: 4500.0
            },
            Bid {
                freelancer_id: m.f2.user_id,
                amount: 4800.0
            },
        ]
    );

    let profile = FreelancerRepo::get_profile(&pool, m.f1.user_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(profile.application_ids, vec![m.app1.id]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_duplicate_application_is_conflict(pool: PgPool) {
    let m = market(&pool).await;

    let err = try_apply(&pool, &m.f1, m.project.id, 4000.0)
        .await
        .unwrap_err();
    assert_matches!(err, CascadeError::Rule(CoreError::Conflict(_)));

    let mine: Vec<_> = ApplicationRepo::list_for_project(&pool, m.project.id)
        .await
        .unwrap()
        .into_iter()
        .filter(|a| a.freelancer_id == m.f1.user_id)
        .collect();
    assert_eq!(mine.len(), 1);

    // The failed attempt left no trace in the bid log.
    let project = ProjectRepo::find_by_id(&pool, m.project.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(project.bids.0.len(), 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_apply_rejections(pool: PgPool) {
    let m = market(&pool).await;

    assert_matches!(
        try_apply(&pool, &m.f1, 999_999, 100.0).await,
        Err(CascadeError::Rule(CoreError::NotFound { .. }))
    );
    assert_matches!(
        try_apply(&pool, &m.client, m.project.id, 100.0).await,
        Err(CascadeError::Rule(CoreError::Forbidden(_)))
    );

    ApplicationRepo::accept(&pool, &m.client, m.app1.id)
        .await
        .unwrap();
    let late = new_user(&pool, "late", Role::Freelancer).await;
    assert_matches!(
        try_apply(&pool, &late, m.project.id, 100.0).await,
        Err(CascadeError::Rule(CoreError::InvalidState(_)))
    );
}

// ---------------------------------------------------------------------------
// Accept / reject
// ---------------------------------------------------------------------------

/// Scenario A.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_accept_assigns_project_and_rejects_sibling(pool: PgPool) {
    let m = market(&pool).await;

    let outcome = ApplicationRepo::accept(&pool, &m.client, m.app1.id)
        .await
        .unwrap();

    assert_eq!(outcome.application.status, ApplicationStatus::Accepted);
    assert_eq!(outcome.project.status, ProjectStatus::InProgress);
    assert_eq!(outcome.project.freelancer_id, Some(m.f1.user_id));
    assert_eq!(outcome.rejected_ids, vec![m.app2.id]);

    let app2 = ApplicationRepo::find_by_id(&pool, m.app2.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(app2.status, ApplicationStatus::Rejected);

    let profile = FreelancerRepo::get_profile(&pool, m.f1.user_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(profile.project_ids, vec![m.project.id]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_accept_leaves_exactly_one_accepted(pool: PgPool) {
    let client = new_user(&pool, "client", Role::Client).await;
    let project = new_project(&pool, &client, 900.0).await;

    let mut apps = Vec::new();
    for i in 0..4 {
        let freelancer = new_user(&pool, &format!("f{i}"), Role::Freelancer).await;
        apps.push(apply(&pool, &freelancer, project.id, 500.0 + i as f64).await);
    }

    ApplicationRepo::accept(&pool, &client, apps[2].id)
        .await
        .unwrap();

    let all = ApplicationRepo::list_for_project(&pool, project.id)
        .await
        .unwrap();
    let accepted: Vec<_> = all
        .iter()
        .filter(|a| a.status == ApplicationStatus::Accepted)
        .collect();
    assert_eq!(accepted.len(), 1);
    assert_eq!(accepted[0].id, apps[2].id);
    assert_eq!(
        all.iter()
            .filter(|a| a.status == ApplicationStatus::Rejected)
            .count(),
        3
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_concurrent_accepts_resolve_to_one_winner(pool: PgPool) {
    let m = market(&pool).await;

    let (first, second) = tokio::join!(
        ApplicationRepo::accept(&pool, &m.client, m.app1.id),
        ApplicationRepo::accept(&pool, &m.client, m.app2.id),
    );

    let winner = match (first, second) {
        (Ok(outcome), Err(err)) | (Err(err), Ok(outcome)) => {
            assert_matches!(err, CascadeError::Rule(CoreError::InvalidState(_)));
            outcome
        }
        (first, second) => panic!("expected exactly one accept to win: {first:?} / {second:?}"),
    };

    let project = ProjectRepo::find_by_id(&pool, m.project.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(project.status, ProjectStatus::InProgress);
    assert_eq!(project.freelancer_id, Some(winner.application.freelancer_id));

    let all = ApplicationRepo::list_for_project(&pool, m.project.id)
        .await
        .unwrap();
    let accepted: Vec<_> = all
        .iter()
        .filter(|a| a.status == ApplicationStatus::Accepted)
        .collect();
    assert_eq!(accepted.len(), 1);
    assert_eq!(accepted[0].id, winner.application.id);
    assert!(all
        .iter()
        .filter(|a| a.id != winner.application.id)
        .all(|a| a.status == ApplicationStatus::Rejected));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_accept_requires_owner_and_pending(pool: PgPool) {
    let m = market(&pool).await;
    let stranger = new_user(&pool, "stranger", Role::Client).await;

    assert_matches!(
        ApplicationRepo::accept(&pool, &stranger, m.app1.id).await,
        Err(CascadeError::Rule(CoreError::Forbidden(_)))
    );
    assert_matches!(
        ApplicationRepo::accept(&pool, &m.client, 999_999).await,
        Err(CascadeError::Rule(CoreError::NotFound { .. }))
    );

    ApplicationRepo::accept(&pool, &m.client, m.app1.id)
        .await
        .unwrap();

    // Accepting again, or accepting the rejected sibling, changes nothing.
    assert_matches!(
        ApplicationRepo::accept(&pool, &m.client, m.app1.id).await,
        Err(CascadeError::Rule(CoreError::InvalidState(_)))
    );
    assert_matches!(
        ApplicationRepo::accept(&pool, &m.client, m.app2.id).await,
        Err(CascadeError::Rule(CoreError::InvalidState(_)))
    );

    let project = ProjectRepo::find_by_id(&pool, m.project.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(project.freelancer_id, Some(m.f1.user_id));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_reject_only_touches_the_application(pool: PgPool) {
    let m = market(&pool).await;

    let rejected = ApplicationRepo::reject(&pool, &m.client, m.app2.id)
        .await
        .unwrap();
    assert_eq!(rejected.status, ApplicationStatus::Rejected);

    assert_matches!(
        ApplicationRepo::reject(&pool, &m.client, m.app2.id).await,
        Err(CascadeError::Rule(CoreError::InvalidState(_)))
    );
    assert_matches!(
        ApplicationRepo::reject(&pool, &m.f1, m.app1.id).await,
        Err(CascadeError::Rule(CoreError::Forbidden(_)))
    );

    let project = ProjectRepo::find_by_id(&pool, m.project.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(project.status, ProjectStatus::Open);
    assert_eq!(
        statuses(&pool, m.project.id).await,
        vec![
            (m.f1.user_id, ApplicationStatus::Pending),
            (m.f2.user_id, ApplicationStatus::Rejected),
        ]
    );
}

// ---------------------------------------------------------------------------
// Submission and opt-out
// ---------------------------------------------------------------------------

/// Scenario B.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_submit_work_completes_and_credits_funds(pool: PgPool) {
    let m = market(&pool).await;
    ApplicationRepo::accept(&pool, &m.client, m.app1.id)
        .await
        .unwrap();

    let project = ProjectRepo::submit_work(&pool, &m.f1, m.project.id, "http://x", "done")
        .await
        .unwrap();

    assert_eq!(project.status, ProjectStatus::Completed);
    assert_eq!(project.freelancer_id, Some(m.f1.user_id));
    let submission = project.submission.expect("submission recorded").0;
    assert_eq!(submission.link, "http://x");
    assert_eq!(submission.note, "done");

    let profile = FreelancerRepo::get_profile(&pool, m.f1.user_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(profile.funds, 5000.0);
    assert_eq!(profile.completed_projects, 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_resubmission_is_invalid_state_and_funds_unchanged(pool: PgPool) {
    let m = market(&pool).await;
    ApplicationRepo::accept(&pool, &m.client, m.app1.id)
        .await
        .unwrap();
    ProjectRepo::submit_work(&pool, &m.f1, m.project.id, "http://x", "done")
        .await
        .unwrap();

    assert_matches!(
        ProjectRepo::submit_work(&pool, &m.f1, m.project.id, "http://y", "again").await,
        Err(CascadeError::Rule(CoreError::InvalidState(_)))
    );

    let profile = FreelancerRepo::get_profile(&pool, m.f1.user_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(profile.funds, 5000.0);
    assert_eq!(profile.completed_projects, 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_submit_by_non_assignee_is_forbidden(pool: PgPool) {
    let m = market(&pool).await;
    ApplicationRepo::accept(&pool, &m.client, m.app1.id)
        .await
        .unwrap();

    assert_matches!(
        ProjectRepo::submit_work(&pool, &m.f2, m.project.id, "http://x", "mine").await,
        Err(CascadeError::Rule(CoreError::Forbidden(_)))
    );
    assert_matches!(
        ProjectRepo::submit_work(&pool, &m.f1, 999_999, "http://x", "done").await,
        Err(CascadeError::Rule(CoreError::NotFound { .. }))
    );
}

/// Scenario C: the project reopens and the accepted application is voided.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_opt_out_reopens_and_voids_acceptance(pool: PgPool) {
    let m = market(&pool).await;
    ApplicationRepo::accept(&pool, &m.client, m.app1.id)
        .await
        .unwrap();

    let outcome = ProjectRepo::opt_out(&pool, &m.f1, m.project.id)
        .await
        .unwrap();

    assert_eq!(outcome.project.status, ProjectStatus::Open);
    assert_eq!(outcome.project.freelancer_id, None);
    assert_eq!(outcome.project.bids.0.len(), 2);
    assert_eq!(outcome.voided_application_ids, vec![m.app1.id]);

    let app1 = ApplicationRepo::find_by_id(&pool, m.app1.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(app1.status, ApplicationStatus::Rejected);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_reopened_project_accepts_a_new_application(pool: PgPool) {
    let m = market(&pool).await;
    ApplicationRepo::accept(&pool, &m.client, m.app1.id)
        .await
        .unwrap();
    ProjectRepo::opt_out(&pool, &m.f1, m.project.id)
        .await
        .unwrap();

    let f3 = new_user(&pool, "f3", Role::Freelancer).await;
    let app3 = apply(&pool, &f3, m.project.id, 4700.0).await;
    let outcome = ApplicationRepo::accept(&pool, &m.client, app3.id)
        .await
        .unwrap();
    assert_eq!(outcome.project.freelancer_id, Some(f3.user_id));

    let accepted = statuses(&pool, m.project.id)
        .await
        .into_iter()
        .filter(|(_, s)| *s == ApplicationStatus::Accepted)
        .count();
    assert_eq!(accepted, 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_opt_out_rules(pool: PgPool) {
    let m = market(&pool).await;

    // Nobody assigned yet.
    assert_matches!(
        ProjectRepo::opt_out(&pool, &m.f1, m.project.id).await,
        Err(CascadeError::Rule(CoreError::Forbidden(_)))
    );

    ApplicationRepo::accept(&pool, &m.client, m.app1.id)
        .await
        .unwrap();
    assert_matches!(
        ProjectRepo::opt_out(&pool, &m.f2, m.project.id).await,
        Err(CascadeError::Rule(CoreError::Forbidden(_)))
    );

    ProjectRepo::submit_work(&pool, &m.f1, m.project.id, "http://x", "done")
        .await
        .unwrap();
    assert_matches!(
        ProjectRepo::opt_out(&pool, &m.f1, m.project.id).await,
        Err(CascadeError::Rule(CoreError::InvalidState(_)))
    );
}

// ---------------------------------------------------------------------------
// Edit and delete
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_patch_applies_only_present_fields(pool: PgPool) {
    let client = new_user(&pool, "client", Role::Client).await;
    let deadline = Utc.with_ymd_and_hms(2027, 1, 31, 0, 0, 0).unwrap();
    let project = ProjectRepo::create(
        &pool,
        &CreateProject {
            client_id: client.user_id,
            title: "Old title".to_string(),
            description: "Desc".to_string(),
            budget: 100.0,
            skills: vec!["Go".to_string()],
            deadline: Some(deadline),
        },
    )
    .await
    .unwrap();

    let patched = ProjectRepo::update(
        &pool,
        project.id,
        &UpdateProject {
            title: Some("New title".to_string()),
            skills: Some(vec![]),
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(patched.title, "New title");
    assert_eq!(patched.description, "Desc");
    assert_eq!(patched.budget, 100.0);
    assert!(patched.skills.is_empty());
    assert_eq!(patched.deadline, Some(deadline));

    let cleared = ProjectRepo::update(
        &pool,
        project.id,
        &UpdateProject {
            deadline: Some(None),
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(cleared.deadline, None);

    let missing = ProjectRepo::update(&pool, 999_999, &UpdateProject::default())
        .await
        .unwrap();
    assert!(missing.is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_admin_status_patch_keeps_assignment_coupling(pool: PgPool) {
    let m = market(&pool).await;

    assert_matches!(
        ProjectRepo::update(
            &pool,
            m.project.id,
            &UpdateProject {
                status: Some(ProjectStatus::Completed),
                ..Default::default()
            },
        )
        .await,
        Err(CascadeError::Rule(CoreError::InvalidState(_)))
    );

    ApplicationRepo::accept(&pool, &m.client, m.app1.id)
        .await
        .unwrap();
    let reopened = ProjectRepo::update(
        &pool,
        m.project.id,
        &UpdateProject {
            status: Some(ProjectStatus::Open),
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(reopened.status, ProjectStatus::Open);
    assert_eq!(reopened.freelancer_id, None);
    assert!(statuses(&pool, m.project.id)
        .await
        .iter()
        .all(|(_, s)| *s == ApplicationStatus::Rejected));
}

/// Scenario D.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delete_cascades_to_applications(pool: PgPool) {
    let m = market(&pool).await;

    let deleted = ProjectRepo::delete(&pool, m.project.id)
        .await
        .unwrap()
        .expect("project existed");
    assert_eq!(deleted.applications_removed, 2);

    assert!(ProjectRepo::find_by_id(&pool, m.project.id)
        .await
        .unwrap()
        .is_none());
    assert!(ApplicationRepo::list_for_project(&pool, m.project.id)
        .await
        .unwrap()
        .is_empty());
    assert!(ApplicationRepo::find_by_id(&pool, m.app1.id)
        .await
        .unwrap()
        .is_none());

    assert!(ProjectRepo::delete(&pool, m.project.id)
        .await
        .unwrap()
        .is_none());
}

// ---------------------------------------------------------------------------
// Listing and stats
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_filters_by_skill_overlap_and_status(pool: PgPool) {
    let m = market(&pool).await;
    let other = ProjectRepo::create(
        &pool,
        &CreateProject {
            client_id: m.client.user_id,
            title: "CLI tool".to_string(),
            description: "Rust CLI".to_string(),
            budget: 300.0,
            skills: vec!["Rust".to_string()],
            deadline: None,
        },
    )
    .await
    .unwrap();
    ApplicationRepo::accept(&pool, &m.client, m.app1.id)
        .await
        .unwrap();

    let rust = ProjectRepo::list(
        &pool,
        &ProjectFilter {
            skills: vec!["Rust".to_string(), "Haskell".to_string()],
            status: None,
        },
    )
    .await
    .unwrap();
    assert_eq!(rust.len(), 1);
    assert_eq!(rust[0].id, other.id);

    let open = ProjectRepo::list(
        &pool,
        &ProjectFilter {
            skills: vec![],
            status: Some(ProjectStatus::Open),
        },
    )
    .await
    .unwrap();
    assert_eq!(open.len(), 1);

    let all = ProjectRepo::list(&pool, &ProjectFilter::default())
        .await
        .unwrap();
    assert_eq!(all.len(), 2);

    let assigned = ProjectRepo::list_by_freelancer(&pool, m.f1.user_id)
        .await
        .unwrap();
    assert_eq!(assigned.len(), 1);
    assert!(ProjectRepo::list_by_freelancer(&pool, m.f2.user_id)
        .await
        .unwrap()
        .is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_stats_count_by_status(pool: PgPool) {
    let m = market(&pool).await;
    ApplicationRepo::accept(&pool, &m.client, m.app1.id)
        .await
        .unwrap();

    let projects = ProjectRepo::stats(&pool).await.unwrap();
    assert_eq!(projects.total, 1);
    assert_eq!(projects.in_progress, 1);

    let applications = ApplicationRepo::stats(&pool).await.unwrap();
    assert_eq!(applications.total, 2);
    assert_eq!(applications.accepted, 1);
    assert_eq!(applications.rejected, 1);
    assert_eq!(applications.pending, 0);

    let users = UserRepo::stats(&pool).await.unwrap();
    assert_eq!(users.total, 3);
    assert_eq!(users.freelancers, 2);
    assert_eq!(users.clients, 1);
}

// ---------------------------------------------------------------------------
// Messages
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_history_is_in_send_order(pool: PgPool) {
    let m = market(&pool).await;

    for (sender, role, text) in [
        (&m.client, Role::Client, "m1"),
        (&m.f1, Role::Freelancer, "m2"),
        (&m.client, Role::Client, "m3"),
    ] {
        MessageRepo::create(
            &pool,
            &CreateMessage {
                project_id: m.project.id,
                sender_id: sender.user_id,
                sender_role: role,
                text: text.to_string(),
            },
        )
        .await
        .unwrap();
    }

    let history = MessageRepo::list_for_project(&pool, m.project.id)
        .await
        .unwrap();
    let texts: Vec<_> = history.iter().map(|msg| msg.text.as_str()).collect();
    assert_eq!(texts, vec!["m1", "m2", "m3"]);
    assert_eq!(history[1].sender_role, Role::Freelancer);
    assert_eq!(history[1].sender_username, "f1");
    assert_eq!(history[2].sender_username, "client");

    assert!(MessageRepo::list_for_project(&pool, 999_999)
        .await
        .unwrap()
        .is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_created_message_carries_sender_username(pool: PgPool) {
    let m = market(&pool).await;

    let message = MessageRepo::create(
        &pool,
        &CreateMessage {
            project_id: m.project.id,
            sender_id: m.client.user_id,
            sender_role: Role::Client,
            text: "hello".to_string(),
        },
    )
    .await
    .unwrap();

    assert_eq!(message.sender_username, "client");
    assert_eq!(message.text, "hello");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_user_summaries_skip_unknown_ids(pool: PgPool) {
    let m = market(&pool).await;

    let people = UserRepo::summaries(&pool, &[m.client.user_id, m.f2.user_id, 999_999])
        .await
        .unwrap();

    assert_eq!(people.len(), 2);
    assert_eq!(people[&m.client.user_id].username, "client");
    assert_eq!(people[&m.f2.user_id].email, "f2@example.com");
    assert!(UserRepo::summaries(&pool, &[]).await.unwrap().is_empty());
}
