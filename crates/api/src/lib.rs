//! Gigboard API server library.
//!
//! Exposes the building blocks (config, state, error handling, routes,
//! WebSocket rooms, chat relay) so integration tests and the binary
//! entrypoint can both reach them.

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod query;
pub mod relay;
pub mod router;
pub mod routes;
pub mod state;
pub mod ws;
