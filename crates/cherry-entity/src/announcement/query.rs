//! Query specifications for announcement listings.

use std::str::FromStr;

use chrono::{DateTime, Utc};

use cherry_core::AppError;
use cherry_core::types::{DateRange, PageRequest, SortField};

use super::status::AnnouncementStatus;

/// Whitelisted sort keys for the admin announcement listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnnouncementSortKey {
    #[default]
    CreatedAt,
    UpdatedAt,
    Title,
    Status,
    Priority,
    PublishDate,
    ExpireDate,
}

impl AnnouncementSortKey {
    /// The column this key orders by.
    pub fn as_column(&self) -> &'static str {
        match self {
            Self::CreatedAt => "created_at",
            Self::UpdatedAt => "updated_at",
            Self::Title => "title",
            Self::Status => "status",
            Self::Priority => "priority",
            Self::PublishDate => "publish_date",
            Self::ExpireDate => "expire_date",
        }
    }
}

impl FromStr for AnnouncementSortKey {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "createdAt" => Ok(Self::CreatedAt),
            "updatedAt" => Ok(Self::UpdatedAt),
            "title" => Ok(Self::Title),
            "status" => Ok(Self::Status),
            "priority" => Ok(Self::Priority),
            "publishDate" => Ok(Self::PublishDate),
            "expireDate" => Ok(Self::ExpireDate),
            _ => Err(AppError::validation(format!(
                "Invalid sort field: '{s}'. Expected one of: createdAt, updatedAt, title, \
                 status, priority, publishDate, expireDate"
            ))),
        }
    }
}

/// Filter, sort, and page for the admin announcement listing.
#[derive(Debug, Clone, Default)]
pub struct AnnouncementQuery {
    /// Case-insensitive substring matched against title OR content.
    pub search: Option<String>,
    /// Status equality filter.
    pub status: Option<AnnouncementStatus>,
    /// Inclusive creation-time window.
    pub created: DateRange,
    /// Single-key sort.
    pub sort: SortField<AnnouncementSortKey>,
    /// Page to return.
    pub page: PageRequest,
}

/// The public listing: announcements visible at `now`, ordered sticky first,
/// then by priority, then newest publish date.
#[derive(Debug, Clone)]
pub struct PublishedQuery {
    /// Evaluation instant for the visibility window.
    pub now: DateTime<Utc>,
    /// Page to return.
    pub page: PageRequest,
}
