//! Project lifecycle rules.
//!
//! A project moves through three statuses:
//!
//! ```text
//!  [open] --(application accepted)--> [in-progress] --(submit work)--> [completed]
//!  [in-progress] --(opt out)--> [open]
//! ```
//!
//! `completed` is terminal for everything except an explicit admin status
//! override. The status and the assigned freelancer are coupled: a project is
//! `open` exactly when nobody is assigned. [`Assignment`] is the only place
//! that computes a new (status, freelancer) pair, so the repositories never
//! write one that breaks the coupling.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::caller::Caller;
use crate::error::CoreError;
use crate::types::{Amount, DbId};

pub const STATUS_OPEN: &str = "open";
pub const STATUS_IN_PROGRESS: &str = "in-progress";
pub const STATUS_COMPLETED: &str = "completed";

/// All valid project status values.
pub const VALID_STATUSES: &[&str] = &[STATUS_OPEN, STATUS_IN_PROGRESS, STATUS_COMPLETED];

/// Maximum length of a project title.
pub const MAX_TITLE_LENGTH: usize = 200;

/// Separator accepted when skills arrive as a single string.
pub const SKILL_DELIMITER: char = ',';

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProjectStatus {
    Open,
    InProgress,
    Completed,
}

impl ProjectStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ProjectStatus::Open => STATUS_OPEN,
            ProjectStatus::InProgress => STATUS_IN_PROGRESS,
            ProjectStatus::Completed => STATUS_COMPLETED,
        }
    }
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProjectStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            STATUS_OPEN => Ok(ProjectStatus::Open),
            STATUS_IN_PROGRESS => Ok(ProjectStatus::InProgress),
            STATUS_COMPLETED => Ok(ProjectStatus::Completed),
            other => Err(CoreError::Validation(format!(
                "Invalid project status '{other}'. Must be one of: {}",
                VALID_STATUSES.join(", ")
            ))),
        }
    }
}

impl TryFrom<String> for ProjectStatus {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

// ---------------------------------------------------------------------------
// Field validation
// ---------------------------------------------------------------------------

/// Skills as they arrive from callers: either a list or one comma-separated
/// string such as `"React, Node"`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum SkillsInput {
    List(Vec<String>),
    Delimited(String),
}

impl SkillsInput {
    /// Trim every entry and drop the empty ones. Order is preserved and
    /// duplicates are kept.
    pub fn normalize(&self) -> Vec<String> {
        match self {
            SkillsInput::List(items) => normalize_skills(items.iter().map(String::as_str)),
            SkillsInput::Delimited(raw) => normalize_skills(raw.split(SKILL_DELIMITER)),
        }
    }
}

/// Trim and drop empty skill names.
pub fn normalize_skills<'a>(raw: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    raw.into_iter()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn validate_title(title: &str) -> Result<(), CoreError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation("Project title is required".into()));
    }
    if trimmed.chars().count() > MAX_TITLE_LENGTH {
        return Err(CoreError::Validation(format!(
            "Project title must be at most {MAX_TITLE_LENGTH} characters"
        )));
    }
    Ok(())
}

pub fn validate_description(description: &str) -> Result<(), CoreError> {
    if description.trim().is_empty() {
        return Err(CoreError::Validation(
            "Project description is required".into(),
        ));
    }
    Ok(())
}

/// A budget must be a finite, strictly positive amount.
pub fn validate_budget(budget: Amount) -> Result<(), CoreError> {
    if !budget.is_finite() || budget <= 0.0 {
        return Err(CoreError::Validation(format!(
            "Budget must be a positive number, got {budget}"
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Assignment state machine
// ---------------------------------------------------------------------------

/// The coupled (status, assigned freelancer) pair of a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Assignment {
    pub status: ProjectStatus,
    pub freelancer_id: Option<DbId>,
}

impl Assignment {
    /// A freshly created project: open and unassigned.
    pub fn open() -> Self {
        Self {
            status: ProjectStatus::Open,
            freelancer_id: None,
        }
    }

    pub fn new(status: ProjectStatus, freelancer_id: Option<DbId>) -> Self {
        Self {
            status,
            freelancer_id,
        }
    }

    /// `open` if and only if no freelancer is assigned.
    pub fn is_consistent(&self) -> bool {
        (self.status == ProjectStatus::Open) == self.freelancer_id.is_none()
    }

    pub fn is_assigned_to(&self, user_id: DbId) -> bool {
        self.freelancer_id == Some(user_id)
    }

    /// Whether the project still accepts applications.
    pub fn ensure_open(&self) -> Result<(), CoreError> {
        if self.status == ProjectStatus::Open {
            Ok(())
        } else {
            Err(CoreError::InvalidState(format!(
                "Project is {} and no longer accepts applications",
                self.status
            )))
        }
    }

    /// An application for `freelancer_id` was accepted.
    pub fn assign(self, freelancer_id: DbId) -> Result<Self, CoreError> {
        self.ensure_open()?;
        Ok(Self {
            status: ProjectStatus::InProgress,
            freelancer_id: Some(freelancer_id),
        })
    }

    /// The assigned freelancer submitted their work.
    pub fn complete(self, caller: &Caller) -> Result<Self, CoreError> {
        self.ensure_assigned_caller(caller)?;
        match self.status {
            ProjectStatus::InProgress => Ok(Self {
                status: ProjectStatus::Completed,
                freelancer_id: self.freelancer_id,
            }),
            ProjectStatus::Completed => Err(CoreError::InvalidState(
                "Work has already been submitted for this project".into(),
            )),
            ProjectStatus::Open => Err(CoreError::InvalidState(
                "Project has no work in progress".into(),
            )),
        }
    }

    /// The assigned freelancer gave the project up before finishing it.
    pub fn reopen(self, caller: &Caller) -> Result<Self, CoreError> {
        self.ensure_assigned_caller(caller)?;
        match self.status {
            ProjectStatus::Completed => Err(CoreError::InvalidState(
                "Cannot opt out of a completed project".into(),
            )),
            ProjectStatus::InProgress | ProjectStatus::Open => Ok(Self::open()),
        }
    }

    /// Admin status override. Setting `open` releases the freelancer; the
    /// other statuses require somebody to already be assigned.
    pub fn with_status(self, status: ProjectStatus) -> Result<Self, CoreError> {
        match status {
            ProjectStatus::Open => Ok(Self::open()),
            ProjectStatus::InProgress | ProjectStatus::Completed => match self.freelancer_id {
                Some(_) => Ok(Self {
                    status,
                    freelancer_id: self.freelancer_id,
                }),
                None => Err(CoreError::InvalidState(format!(
                    "Cannot mark an unassigned project as {status}"
                ))),
            },
        }
    }

    fn ensure_assigned_caller(&self, caller: &Caller) -> Result<(), CoreError> {
        if self.is_assigned_to(caller.user_id) {
            Ok(())
        } else {
            Err(CoreError::Forbidden(
                "Not authorized or not assigned to this project".into(),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::roles::Role;

    const FREELANCER: DbId = 10;
    const OTHER_FREELANCER: DbId = 11;

    fn freelancer() -> Caller {
        Caller::new(FREELANCER, Role::Freelancer)
    }

    // -- status names --

    #[test]
    fn test_status_names_match_storage_values() {
        assert_eq!(ProjectStatus::InProgress.as_str(), "in-progress");
        assert_eq!(
            serde_json::to_string(&ProjectStatus::InProgress).unwrap(),
            "\"in-progress\""
        );
        assert_eq!(
            "completed".parse::<ProjectStatus>().unwrap(),
            ProjectStatus::Completed
        );
        assert!("in_progress".parse::<ProjectStatus>().is_err());
    }

    // -- skills --

    #[test]
    fn test_delimited_skills_are_split_and_trimmed() {
        let input = SkillsInput::Delimited(" React , Node,, ".into());
        assert_eq!(input.normalize(), vec!["React", "Node"]);
    }

    #[test]
    fn test_list_skills_drop_blank_entries_and_keep_duplicates() {
        let input = SkillsInput::List(vec![" Rust".into(), "".into(), "Rust ".into()]);
        assert_eq!(input.normalize(), vec!["Rust", "Rust"]);
    }

    #[test]
    fn test_skills_input_accepts_both_json_shapes() {
        let list: SkillsInput = serde_json::from_str(r#"["React","Node"]"#).unwrap();
        let text: SkillsInput = serde_json::from_str(r#""React,Node""#).unwrap();
        assert_eq!(list.normalize(), text.normalize());
    }

    // -- field validation --

    #[test]
    fn test_budget_must_be_positive() {
        assert!(validate_budget(5000.0).is_ok());
        assert_matches!(validate_budget(0.0), Err(CoreError::Validation(_)));
        assert_matches!(validate_budget(-1.0), Err(CoreError::Validation(_)));
        assert_matches!(validate_budget(f64::NAN), Err(CoreError::Validation(_)));
    }

    #[test]
    fn test_blank_title_and_description_rejected() {
        assert!(validate_title("Landing page").is_ok());
        assert_matches!(validate_title("   "), Err(CoreError::Validation(_)));
        assert_matches!(validate_description(""), Err(CoreError::Validation(_)));
        let long = "x".repeat(MAX_TITLE_LENGTH + 1);
        assert_matches!(validate_title(&long), Err(CoreError::Validation(_)));
    }

    // -- transitions --

    #[test]
    fn test_assign_moves_open_to_in_progress() {
        let next = Assignment::open().assign(FREELANCER).unwrap();
        assert_eq!(next.status, ProjectStatus::InProgress);
        assert_eq!(next.freelancer_id, Some(FREELANCER));
    }

    #[test]
    fn test_assign_requires_open_project() {
        let taken = Assignment::open().assign(FREELANCER).unwrap();
        assert_matches!(
            taken.assign(OTHER_FREELANCER),
            Err(CoreError::InvalidState(_))
        );
    }

    #[test]
    fn test_complete_by_assigned_freelancer() {
        let done = Assignment::open()
            .assign(FREELANCER)
            .unwrap()
            .complete(&freelancer())
            .unwrap();
        assert_eq!(done.status, ProjectStatus::Completed);
        assert_eq!(done.freelancer_id, Some(FREELANCER));
    }

    #[test]
    fn test_complete_by_someone_else_is_forbidden() {
        let in_progress = Assignment::open().assign(FREELANCER).unwrap();
        let other = Caller::new(OTHER_FREELANCER, Role::Freelancer);
        assert_matches!(in_progress.complete(&other), Err(CoreError::Forbidden(_)));
    }

    #[test]
    fn test_resubmission_is_invalid_state() {
        let done = Assignment::open()
            .assign(FREELANCER)
            .unwrap()
            .complete(&freelancer())
            .unwrap();
        assert_matches!(done.complete(&freelancer()), Err(CoreError::InvalidState(_)));
    }

    #[test]
    fn test_complete_on_unassigned_project_is_forbidden() {
        assert_matches!(
            Assignment::open().complete(&freelancer()),
            Err(CoreError::Forbidden(_))
        );
    }

    #[test]
    fn test_opt_out_reopens_and_clears_freelancer() {
        let reopened = Assignment::open()
            .assign(FREELANCER)
            .unwrap()
            .reopen(&freelancer())
            .unwrap();
        assert_eq!(reopened, Assignment::open());
    }

    #[test]
    fn test_opt_out_of_completed_project_is_invalid_state() {
        let done = Assignment::new(ProjectStatus::Completed, Some(FREELANCER));
        assert_matches!(done.reopen(&freelancer()), Err(CoreError::InvalidState(_)));
    }

    #[test]
    fn test_opt_out_by_non_assignee_is_forbidden() {
        let in_progress = Assignment::open().assign(FREELANCER).unwrap();
        let other = Caller::new(OTHER_FREELANCER, Role::Freelancer);
        assert_matches!(in_progress.reopen(&other), Err(CoreError::Forbidden(_)));
        assert_matches!(
            Assignment::open().reopen(&freelancer()),
            Err(CoreError::Forbidden(_))
        );
    }

    #[test]
    fn test_admin_status_override_keeps_coupling() {
        let in_progress = Assignment::open().assign(FREELANCER).unwrap();
        assert_eq!(
            in_progress.with_status(ProjectStatus::Open).unwrap(),
            Assignment::open()
        );
        assert_eq!(
            in_progress
                .with_status(ProjectStatus::Completed)
                .unwrap()
                .freelancer_id,
            Some(FREELANCER)
        );
        assert_matches!(
            Assignment::open().with_status(ProjectStatus::InProgress),
            Err(CoreError::InvalidState(_))
        );
    }

    /// Walk every sequence of up to five operations from a fresh project and
    /// check the open/unassigned coupling after each successful step.
    #[test]
    fn test_coupling_holds_on_every_reachable_path() {
        #[derive(Clone, Copy)]
        enum Op {
            Accept(DbId),
            Submit(DbId),
            OptOut(DbId),
        }
        let ops = [
            Op::Accept(FREELANCER),
            Op::Accept(OTHER_FREELANCER),
            Op::Submit(FREELANCER),
            Op::Submit(OTHER_FREELANCER),
            Op::OptOut(FREELANCER),
            Op::OptOut(OTHER_FREELANCER),
        ];

        let mut frontier = vec![Assignment::open()];
        for _ in 0..5 {
            let mut next = Vec::new();
            for state in &frontier {
                assert!(state.is_consistent(), "inconsistent state {state:?}");
                for op in ops {
                    let result = match op {
                        Op::Accept(id) => state.assign(id),
                        Op::Submit(id) => state.complete(&Caller::new(id, Role::Freelancer)),
                        Op::OptOut(id) => state.reopen(&Caller::new(id, Role::Freelancer)),
                    };
                    if let Ok(s) = result {
                        assert!(s.is_consistent(), "inconsistent state {s:?}");
                        if !next.contains(&s) {
                            next.push(s);
                        }
                    }
                }
            }
            frontier = next;
        }
    }
}
