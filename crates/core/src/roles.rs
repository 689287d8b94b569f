//! Marketplace roles.
//!
//! The role names are stored verbatim in `users.role` and embedded in JWT
//! claims, so the string constants must match the CHECK constraint in
//! `20260301000001_create_users.sql`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

pub const ROLE_FREELANCER: &str = "freelancer";
pub const ROLE_CLIENT: &str = "client";
pub const ROLE_ADMIN: &str = "admin";

/// All valid role names.
pub const VALID_ROLES: &[&str] = &[ROLE_FREELANCER, ROLE_CLIENT, ROLE_ADMIN];

/// The closed set of roles a user can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Freelancer,
    Client,
    Admin,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Freelancer => ROLE_FREELANCER,
            Role::Client => ROLE_CLIENT,
            Role::Admin => ROLE_ADMIN,
        }
    }

    /// Whether a user may pick this role when registering themselves.
    pub fn is_self_assignable(self) -> bool {
        match self {
            Role::Freelancer | Role::Client => true,
            Role::Admin => false,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            ROLE_FREELANCER => Ok(Role::Freelancer),
            ROLE_CLIENT => Ok(Role::Client),
            ROLE_ADMIN => Ok(Role::Admin),
            other => Err(CoreError::Validation(format!(
                "Invalid role '{other}'. Must be one of: {}",
                VALID_ROLES.join(", ")
            ))),
        }
    }
}

impl TryFrom<String> for Role {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
