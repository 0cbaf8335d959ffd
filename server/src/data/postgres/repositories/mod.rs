//! PostgreSQL repositories

pub mod site;
