//! Authentication module for the historial gateway.
//!
//! - Credentials: static username/password table checked at login
//! - JWT: signed, time-limited bearer tokens
//! - Middleware: bearer-token gate in front of record routes

mod credentials;
mod jwt;
mod middleware;

pub use credentials::*;
pub use jwt::*;
pub use middleware::*;
