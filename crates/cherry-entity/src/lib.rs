//! # cherry-entity
//!
//! Domain entity models for the Cherry Studio API. Every struct in this
//! crate represents a database row, a domain value object, or a
//! storage-independent query specification. Database entities derive
//! `sqlx::FromRow`.

pub mod announcement;
pub mod user;
