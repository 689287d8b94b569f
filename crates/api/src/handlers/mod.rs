//! HTTP handlers, one module per resource.

pub mod admin;
pub mod application;
pub mod auth;
pub mod message;
pub mod project;
pub mod users;
