//! Role-to-capability mapping definitions.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use cherry_entity::user::UserRole;

/// A system-level capability required by a group of operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    /// List, inspect, edit, and delete any account.
    ManageUsers,
    /// Create, list, edit, and delete announcements.
    ManageAnnouncements,
}

/// Defines the mapping from each role to its set of capabilities.
#[derive(Debug, Clone)]
pub struct RbacPolicies {
    /// Role → set of capabilities.
    policies: HashMap<UserRole, HashSet<Capability>>,
}

impl RbacPolicies {
    /// Creates the default policy set.
    pub fn new() -> Self {
        let mut policies = HashMap::new();

        // User: self-service only
        policies.insert(UserRole::User, HashSet::new());

        // Admin: everything
        let admin: HashSet<Capability> = [Capability::ManageUsers, Capability::ManageAnnouncements]
            .into_iter()
            .collect();
        policies.insert(UserRole::Admin, admin);

        Self { policies }
    }

    /// Returns the set of capabilities for the given role.
    pub fn capabilities_for_role(&self, role: UserRole) -> HashSet<Capability> {
        self.policies.get(&role).cloned().unwrap_or_default()
    }

    /// Checks whether the given role has the specified capability.
    pub fn has_capability(&self, role: UserRole, capability: Capability) -> bool {
        self.policies
            .get(&role)
            .is_some_and(|caps| caps.contains(&capability))
    }
}

impl Default for RbacPolicies {
    fn default() -> Self {
        Self::new()
    }
}
