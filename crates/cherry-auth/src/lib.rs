//! # cherry-auth
//!
//! Authentication primitives for the Cherry Studio API.
//!
//! ## Modules
//!
//! - `jwt`: identity token issuance and verification
//! - `reset`: single-use password reset tokens
//! - `password`: Argon2id password hashing and policy enforcement
//! - `rbac`: role to capability mapping

pub mod jwt;
pub mod password;
pub mod rbac;
pub mod reset;

pub use jwt::{Claims, JwtDecoder, JwtEncoder, TokenError};
pub use password::{PasswordHasher, PasswordValidator};
pub use rbac::{Capability, RbacEnforcer, RbacPolicies};
pub use reset::ResetToken;
