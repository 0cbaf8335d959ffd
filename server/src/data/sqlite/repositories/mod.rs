//! SQLite repositories

pub mod site;
