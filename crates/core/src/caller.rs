//! Explicit caller context.
//!
//! Every marketplace operation receives the acting user as a [`Caller`]
//! argument. Nothing in the system reads a "current user" from ambient state.

use crate::error::CoreError;
use crate::roles::Role;
use crate::types::DbId;

/// The authenticated user performing an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caller {
    pub user_id: DbId,
    pub role: Role,
}

impl Caller {
    pub fn new(user_id: DbId, role: Role) -> Self {
        Self { user_id, role }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Fail with `Forbidden` unless the caller holds exactly `role`.
    pub fn require_role(&self, role: Role) -> Result<(), CoreError> {
        if self.role == role {
            Ok(())
        } else {
            Err(CoreError::Forbidden(format!("{} role required", role)))
        }
    }

    /// Fail with `Forbidden` unless the caller is `owner_id` or an admin.
    pub fn require_owner_or_admin(&self, owner_id: DbId, what: &str) -> Result<(), CoreError> {
        match self.role {
            Role::Admin => Ok(()),
            Role::Client | Role::Freelancer if self.user_id == owner_id => Ok(()),
            Role::Client | Role::Freelancer => Err(CoreError::Forbidden(format!(
                "Not authorized to modify this {what}"
            ))),
        }
    }
}
