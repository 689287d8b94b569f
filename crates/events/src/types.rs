//! Event type names published on the bus.

pub const PROJECT_CREATED: &str = "project.created";
pub const PROJECT_UPDATED: &str = "project.updated";
pub const PROJECT_ASSIGNED: &str = "project.assigned";
pub const PROJECT_COMPLETED: &str = "project.completed";
pub const PROJECT_REOPENED: &str = "project.reopened";
pub const PROJECT_DELETED: &str = "project.deleted";

pub const APPLICATION_SUBMITTED: &str = "application.submitted";
pub const APPLICATION_ACCEPTED: &str = "application.accepted";
pub const APPLICATION_REJECTED: &str = "application.rejected";

pub const MESSAGE_SENT: &str = "message.sent";

pub const USER_REGISTERED: &str = "user.registered";
pub const USER_DELETED: &str = "user.deleted";

/// Source entity kinds.
pub const ENTITY_PROJECT: &str = "project";
pub const ENTITY_APPLICATION: &str = "application";
pub const ENTITY_MESSAGE: &str = "message";
pub const ENTITY_USER: &str = "user";
