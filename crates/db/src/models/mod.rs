//! Row structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A create DTO for inserts
//! - An update DTO (all `Option` fields) for patches, where one exists

pub mod application;
pub mod event;
pub mod freelancer;
pub mod message;
pub mod project;
pub mod stats;
pub mod user;
