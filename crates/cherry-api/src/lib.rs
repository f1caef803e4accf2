//! # cherry-api
//!
//! HTTP API layer for Cherry Studio built on Axum.
//!
//! Provides the REST endpoints, the access gate (bearer token extractor and
//! capability route guards), middleware (CORS, compression, logging),
//! DTOs, and error mapping.

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::{build_app, run_server};
pub use state::{AppState, build_state};
