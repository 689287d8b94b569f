//! Gigboard domain rules.
//!
//! This crate holds everything about the marketplace that does not need I/O:
//! identifiers, roles and the explicit caller context, the error taxonomy,
//! the project status machine, the application acceptance cascade, and chat
//! message validation. The `db` and `api` crates call into these rules before
//! touching storage so that every decision point is exercised by plain unit
//! tests.

pub mod application;
pub mod caller;
pub mod error;
pub mod messaging;
pub mod patch;
pub mod project;
pub mod roles;
pub mod types;
