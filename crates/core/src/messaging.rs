//! Project chat rules.
//!
//! A project's participants are its owning client and, once assigned, its
//! freelancer. Participants may read and send; admins may read and watch the
//! live room but never post.

use crate::caller::Caller;
use crate::error::CoreError;
use crate::roles::Role;
use crate::types::DbId;

/// Maximum message length in characters, after trimming.
pub const MAX_MESSAGE_LENGTH: usize = 5000;

/// How a caller relates to a project's chat.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatAccess {
    /// Owning client or assigned freelancer. Carries the role recorded as
    /// the sender of their messages.
    Participant(Role),
    /// Admin oversight: read-only.
    Observer,
    None,
}

impl ChatAccess {
    pub fn resolve(caller: &Caller, client_id: DbId, freelancer_id: Option<DbId>) -> Self {
        match caller.role {
            Role::Client if caller.user_id == client_id => ChatAccess::Participant(Role::Client),
            Role::Freelancer if freelancer_id == Some(caller.user_id) => {
                ChatAccess::Participant(Role::Freelancer)
            }
            Role::Admin => ChatAccess::Observer,
            Role::Client | Role::Freelancer => ChatAccess::None,
        }
    }

    /// History reads and live room membership.
    pub fn ensure_can_read(self) -> Result<(), CoreError> {
        match self {
            ChatAccess::Participant(_) | ChatAccess::Observer => Ok(()),
            ChatAccess::None => Err(CoreError::Forbidden(
                "Not a participant of this project".into(),
            )),
        }
    }

    /// Returns the sender role to record on the message.
    pub fn ensure_can_send(self) -> Result<Role, CoreError> {
        match self {
            ChatAccess::Participant(role) => Ok(role),
            ChatAccess::Observer | ChatAccess::None => Err(CoreError::Forbidden(
                "Only project participants can send messages".into(),
            )),
        }
    }
}

/// Trim the text and enforce the length bounds.
pub fn normalize_text(raw: &str) -> Result<String, CoreError> {
    let text = raw.trim();
    if text.is_empty() {
        return Err(CoreError::Validation("Message text is required".into()));
    }
    if text.chars().count() > MAX_MESSAGE_LENGTH {
        return Err(CoreError::Validation(format!(
            "Message text must be at most {MAX_MESSAGE_LENGTH} characters"
        )));
    }
    Ok(text.to_string())
}
