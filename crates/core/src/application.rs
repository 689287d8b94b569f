//! Application (bid) rules and the acceptance cascade.
//!
//! Applications are `pending` until the project owner decides. Accepting one
//! resolves the whole project: the chosen application becomes `accepted` and
//! every sibling becomes `rejected`. [`plan_acceptance`] computes that outcome
//! from the current sibling statuses; the repository applies it inside the
//! same transaction that assigns the project.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::caller::Caller;
use crate::error::CoreError;
use crate::roles::Role;
use crate::types::{Amount, DbId};

pub const STATUS_PENDING: &str = "pending";
pub const STATUS_ACCEPTED: &str = "accepted";
pub const STATUS_REJECTED: &str = "rejected";

/// All valid application status values.
pub const VALID_STATUSES: &[&str] = &[STATUS_PENDING, STATUS_ACCEPTED, STATUS_REJECTED];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    Pending,
    Accepted,
    Rejected,
}

impl ApplicationStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ApplicationStatus::Pending => STATUS_PENDING,
            ApplicationStatus::Accepted => STATUS_ACCEPTED,
            ApplicationStatus::Rejected => STATUS_REJECTED,
        }
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApplicationStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            STATUS_PENDING => Ok(ApplicationStatus::Pending),
            STATUS_ACCEPTED => Ok(ApplicationStatus::Accepted),
            STATUS_REJECTED => Ok(ApplicationStatus::Rejected),
            other => Err(CoreError::Validation(format!(
                "Invalid application status '{other}'. Must be one of: {}",
                VALID_STATUSES.join(", ")
            ))),
        }
    }
}

impl TryFrom<String> for ApplicationStatus {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

// ---------------------------------------------------------------------------
// Submission checks
// ---------------------------------------------------------------------------

pub fn validate_proposal(proposal: &str) -> Result<(), CoreError> {
    if proposal.trim().is_empty() {
        return Err(CoreError::Validation("Proposal is required".into()));
    }
    Ok(())
}

pub fn validate_bid(bid: Amount) -> Result<(), CoreError> {
    if !bid.is_finite() || bid <= 0.0 {
        return Err(CoreError::Validation(format!(
            "Bid must be a positive number, got {bid}"
        )));
    }
    Ok(())
}

/// Only freelancers apply, and never to their own project.
pub fn ensure_can_apply(caller: &Caller, project_client_id: DbId) -> Result<(), CoreError> {
    caller.require_role(Role::Freelancer)?;
    if caller.user_id == project_client_id {
        return Err(CoreError::Forbidden(
            "Cannot apply to your own project".into(),
        ));
    }
    Ok(())
}

/// Accept and reject are reserved to the client who owns the project, and
/// only while the application is still pending.
pub fn ensure_can_decide(
    caller: &Caller,
    application_client_id: DbId,
    status: ApplicationStatus,
) -> Result<(), CoreError> {
    if caller.user_id != application_client_id {
        return Err(CoreError::Forbidden(
            "Only the project owner can decide on applications".into(),
        ));
    }
    match status {
        ApplicationStatus::Pending => Ok(()),
        ApplicationStatus::Accepted | ApplicationStatus::Rejected => Err(
            CoreError::InvalidState(format!("Application is already {status}")),
        ),
    }
}

// ---------------------------------------------------------------------------
// Acceptance cascade
// ---------------------------------------------------------------------------

/// Status changes produced by accepting one application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcceptancePlan {
    pub accepted: DbId,
    /// Siblings whose status changes to `rejected`. Already-rejected
    /// applications are not listed.
    pub rejected: Vec<DbId>,
}

/// Compute the cascade for accepting `accepted_id` given every application
/// currently filed against the project, the chosen one included.
pub fn plan_acceptance(
    accepted_id: DbId,
    applications: &[(DbId, ApplicationStatus)],
) -> Result<AcceptancePlan, CoreError> {
    let chosen = applications
        .iter()
        .find(|(id, _)| *id == accepted_id)
        .ok_or(CoreError::NotFound {
            entity: "Application",
            id: accepted_id,
        })?;

    if chosen.1 != ApplicationStatus::Pending {
        return Err(CoreError::InvalidState(format!(
            "Application is already {}",
            chosen.1
        )));
    }

    let mut rejected = Vec::new();
    for &(id, status) in applications {
        if id == accepted_id {
            continue;
        }
        match status {
            ApplicationStatus::Pending => rejected.push(id),
            ApplicationStatus::Rejected => {}
            ApplicationStatus::Accepted => {
                return Err(CoreError::Conflict(format!(
                    "Project already has an accepted application ({id})"
                )));
            }
        }
    }

    Ok(AcceptancePlan {
        accepted: accepted_id,
        rejected,
    })
}
