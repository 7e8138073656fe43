//! megagraph — same-type relationship closures for Mega objects.
//!
//! Resolves parent/child relatives over a relationship graph restricted to
//! one object type, caches ancestor closures per request, and decides when
//! automatic mappings between Mega objects must not propagate.

pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod graph;
pub mod observability;
pub mod request;
pub mod types;
