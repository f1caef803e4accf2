//! Route handlers organized by domain.

pub mod admin;
pub mod announcement;
pub mod auth;
pub mod health;
