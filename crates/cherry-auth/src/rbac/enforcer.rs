//! RBAC enforcement logic: checks whether a role holds a required capability.

use cherry_core::error::AppError;
use cherry_entity::user::UserRole;

use super::policies::{Capability, RbacPolicies};

/// Message returned when a role lacks a capability.
pub const FORBIDDEN_MESSAGE: &str = "You do not have permission to perform this action";

/// Enforces role-based access control for system-level operations.
#[derive(Debug, Clone, Default)]
pub struct RbacEnforcer {
    /// The policy configuration.
    policies: RbacPolicies,
}

impl RbacEnforcer {
    /// Creates a new enforcer with the default policy set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `Ok(())` if allowed, or an `Authorization` error if denied.
    pub fn require(&self, role: UserRole, capability: Capability) -> Result<(), AppError> {
        if self.policies.has_capability(role, capability) {
            Ok(())
        } else {
            Err(AppError::authorization(FORBIDDEN_MESSAGE))
        }
    }

    /// Returns a reference to the underlying policies.
    pub fn policies(&self) -> &RbacPolicies {
        &self.policies
    }
}
