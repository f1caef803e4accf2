//! Announcement lifecycle status.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle status of an announcement.
///
/// Transitions between any pair are allowed; only entering `Published`
/// carries a side effect (see [`super::Announcement::transition_to`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "announcement_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AnnouncementStatus {
    /// Not yet visible.
    #[default]
    Draft,
    /// Visible inside its publish/expire window.
    Published,
    /// Retired.
    Archived,
}

impl AnnouncementStatus {
    /// Return the status as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Published => "published",
            Self::Archived => "archived",
        }
    }

    /// Lifecycle ordinal, used when sorting by status.
    pub fn ordinal(&self) -> u8 {
        match self {
            Self::Draft => 0,
            Self::Published => 1,
            Self::Archived => 2,
        }
    }
}

impl fmt::Display for AnnouncementStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for AnnouncementStatus {
    type Err = cherry_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "draft" => Ok(Self::Draft),
            "published" => Ok(Self::Published),
            "archived" => Ok(Self::Archived),
            _ => Err(cherry_core::AppError::validation(format!(
                "Invalid status value: '{s}'. Expected one of: draft, published, archived"
            ))),
        }
    }
}
