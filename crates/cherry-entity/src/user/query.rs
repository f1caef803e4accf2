//! Storage-independent query specification for user listings.

use std::str::FromStr;

use cherry_core::AppError;
use cherry_core::types::{DateRange, PageRequest, SortField};

use super::role::UserRole;

/// Whitelisted sort keys for user listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UserSortKey {
    /// Creation time (default).
    #[default]
    CreatedAt,
    /// Last update time.
    UpdatedAt,
    /// Display name.
    Name,
    /// Email address.
    Email,
    /// Role.
    Role,
}

impl UserSortKey {
    /// The column this key orders by.
    pub fn as_column(&self) -> &'static str {
        match self {
            Self::CreatedAt => "created_at",
            Self::UpdatedAt => "updated_at",
            Self::Name => "name",
            Self::Email => "email",
            Self::Role => "role",
        }
    }
}

impl FromStr for UserSortKey {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "createdAt" => Ok(Self::CreatedAt),
            "updatedAt" => Ok(Self::UpdatedAt),
            "name" => Ok(Self::Name),
            "email" => Ok(Self::Email),
            "role" => Ok(Self::Role),
            _ => Err(AppError::validation(format!(
                "Invalid sort field: '{s}'. Expected one of: createdAt, updatedAt, name, email, role"
            ))),
        }
    }
}

/// Filter, sort, and page for a user listing.
#[derive(Debug, Clone, Default)]
pub struct UserQuery {
    /// Case-insensitive substring matched against name OR email.
    pub search: Option<String>,
    /// Role equality filter.
    pub role: Option<UserRole>,
    /// Inclusive creation-time window.
    pub created: DateRange,
    /// Single-key sort.
    pub sort: SortField<UserSortKey>,
    /// Page to return.
    pub page: PageRequest,
}

#[cfg(test)]
mod tests {
    use super::*;
    use cherry_core::types::SortDirection;

    #[test]
    fn test_sort_key_whitelist() {
        assert_eq!("email".parse::<UserSortKey>().unwrap(), UserSortKey::Email);
        assert!("password".parse::<UserSortKey>().is_err());
        assert!("created_at".parse::<UserSortKey>().is_err());
    }

    #[test]
    fn test_default_query_sorts_newest_first() {
        let q = UserQuery::default();
        assert_eq!(q.sort.key, UserSortKey::CreatedAt);
        assert_eq!(q.sort.direction, SortDirection::Desc);
        assert_eq!(q.page.page, 1);
    }
}
