//! API route handlers

pub mod auth;
pub mod debug;
pub mod health;
pub mod reports;
pub mod sites;
