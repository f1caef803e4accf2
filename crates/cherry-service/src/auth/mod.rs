//! Authentication and password recovery.

pub mod service;

pub use service::{
    AuthService, AuthSession, AuthSettings, LoginRequest, RegisterRequest, UpdatePasswordRequest,
};
