//! Shared data types for all database backends
//!
//! Row types used by both SQLite and PostgreSQL.

mod transactional;

pub use transactional::{SiteRow, SiteUpdate};
