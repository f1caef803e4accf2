//! Announcement entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use cherry_core::{AppError, AppResult};

use super::status::AnnouncementStatus;

/// Maximum title length, in characters.
pub const MAX_TITLE_CHARS: usize = 100;
/// Highest allowed priority.
pub const MAX_PRIORITY: i32 = 10;

/// A site-wide announcement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Announcement {
    /// Unique identifier.
    pub id: Uuid,
    /// Headline, 1 to 100 characters.
    pub title: String,
    /// Rich-text body.
    pub content: String,
    /// Lifecycle status.
    pub status: AnnouncementStatus,
    /// 0 (lowest) to 10 (highest).
    pub priority: i32,
    /// Sorts ahead of non-sticky peers in the public listing.
    pub is_sticky: bool,
    /// Start of the visibility window.
    pub publish_date: Option<DateTime<Utc>>,
    /// End of the visibility window (exclusive).
    pub expire_date: Option<DateTime<Utc>>,
    /// Admin who created the announcement.
    pub created_by: Uuid,
    /// Admin who last changed the announcement.
    pub updated_by: Uuid,
    /// When the announcement was created.
    pub created_at: DateTime<Utc>,
    /// When the announcement was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Announcement {
    /// Build a fresh record from creation input, applying the publish stamp.
    pub fn create(input: NewAnnouncement, id: Uuid, now: DateTime<Utc>) -> AppResult<Self> {
        let mut announcement = Self {
            id,
            title: input.title.trim().to_string(),
            content: input.content,
            status: AnnouncementStatus::Draft,
            priority: input.priority,
            is_sticky: input.is_sticky,
            publish_date: input.publish_date,
            expire_date: input.expire_date,
            created_by: input.created_by,
            updated_by: input.created_by,
            created_at: now,
            updated_at: now,
        };
        announcement.transition_to(input.status, now);
        announcement.validate()?;
        Ok(announcement)
    }

    /// Check field constraints and the publish/expire ordering.
    pub fn validate(&self) -> AppResult<()> {
        let title_len = self.title.trim().chars().count();
        if title_len == 0 {
            return Err(AppError::validation("Title is required"));
        }
        if title_len > MAX_TITLE_CHARS {
            return Err(AppError::validation(format!(
                "Title must be at most {MAX_TITLE_CHARS} characters"
            )));
        }
        if self.content.trim().is_empty() {
            return Err(AppError::validation("Content is required"));
        }
        if !(0..=MAX_PRIORITY).contains(&self.priority) {
            return Err(AppError::validation(format!(
                "Priority must be between 0 and {MAX_PRIORITY}"
            )));
        }
        if let (Some(publish), Some(expire)) = (self.publish_date, self.expire_date)
            && expire <= publish
        {
            return Err(AppError::validation(
                "Expire date must be after the publish date",
            ));
        }
        Ok(())
    }

    /// Whether the public listing shows this announcement at `now`.
    pub fn is_visible_at(&self, now: DateTime<Utc>) -> bool {
        self.status == AnnouncementStatus::Published
            && self.publish_date.is_some_and(|p| p <= now)
            && self.expire_date.is_none_or(|e| e > now)
    }

    /// Move to `status`. Entering `Published` stamps `now` as the publish
    /// date when none is set.
    pub fn transition_to(&mut self, status: AnnouncementStatus, now: DateTime<Utc>) {
        if status == AnnouncementStatus::Published && self.publish_date.is_none() {
            self.publish_date = Some(now);
        }
        self.status = status;
    }

    /// Merge a partial edit, record the actor, and revalidate.
    pub fn apply(
        &mut self,
        changes: AnnouncementChanges,
        actor: Uuid,
        now: DateTime<Utc>,
    ) -> AppResult<()> {
        if let Some(title) = changes.title {
            self.title = title.trim().to_string();
        }
        if let Some(content) = changes.content {
            self.content = content;
        }
        if let Some(priority) = changes.priority {
            self.priority = priority;
        }
        if let Some(is_sticky) = changes.is_sticky {
            self.is_sticky = is_sticky;
        }
        if let Some(publish_date) = changes.publish_date {
            self.publish_date = publish_date;
        }
        if let Some(expire_date) = changes.expire_date {
            self.expire_date = expire_date;
        }
        // Re-entering the current status restamps a cleared publish date.
        self.transition_to(changes.status.unwrap_or(self.status), now);
        self.validate()?;
        self.touch(actor, now);
        Ok(())
    }

    /// Record an edit by `actor` at `now`.
    pub fn touch(&mut self, actor: Uuid, now: DateTime<Utc>) {
        self.updated_by = actor;
        self.updated_at = now;
    }
}

/// Input for creating an announcement.
#[derive(Debug, Clone)]
pub struct NewAnnouncement {
    /// Headline.
    pub title: String,
    /// Body.
    pub content: String,
    /// Initial status.
    pub status: AnnouncementStatus,
    /// Priority.
    pub priority: i32,
    /// Sticky flag.
    pub is_sticky: bool,
    /// Publish date.
    pub publish_date: Option<DateTime<Utc>>,
    /// Expire date.
    pub expire_date: Option<DateTime<Utc>>,
    /// Creating admin.
    pub created_by: Uuid,
}

/// A partial edit. For the dates, `Some(None)` clears the value.
#[derive(Debug, Clone, Default)]
pub struct AnnouncementChanges {
    pub title: Option<String>,
    pub content: Option<String>,
    pub status: Option<AnnouncementStatus>,
    pub priority: Option<i32>,
    pub is_sticky: Option<bool>,
    pub publish_date: Option<Option<DateTime<Utc>>>,
    pub expire_date: Option<Option<DateTime<Utc>>>,
}
