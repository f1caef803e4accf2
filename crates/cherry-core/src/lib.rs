//! # cherry-core
//!
//! Core crate for the Cherry Studio API. Contains configuration schemas,
//! the unified error system, pagination/sorting/date-range types, and the
//! storage and mail traits implemented by other crates.
//!
//! This crate has **no** internal dependencies on other Cherry crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
