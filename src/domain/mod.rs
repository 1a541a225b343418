//! Domain types for the historial gateway.

mod record;

pub use record::*;
