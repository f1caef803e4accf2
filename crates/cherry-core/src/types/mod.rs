//! Core type definitions used across the workspace.

pub mod pagination;
pub mod query;
pub mod sorting;

pub use pagination::{PageRequest, PageResponse};
pub use query::{DateRange, ListParams};
pub use sorting::{SortDirection, SortField};
