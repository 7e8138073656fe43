//! Persistence layer — SQLite schema and row conversions.

pub mod converters;
pub mod schema;
