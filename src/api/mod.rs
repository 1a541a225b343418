//! HTTP API layer for the historial gateway.
//!
//! Provides the login and record lookup endpoints.

pub mod handlers;
mod routes;
mod types;

pub use routes::build_router;
