//! Announcement management and the public published feed.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};
use tracing::info;
use uuid::Uuid;

use cherry_auth::{Capability, RbacEnforcer};
use cherry_core::error::AppError;
use cherry_core::result::AppResult;
use cherry_core::types::{ListParams, PageResponse};
use cherry_database::{AnnouncementStore, UserStore};
use cherry_entity::announcement::{
    Announcement, AnnouncementChanges, AnnouncementStatus, NewAnnouncement,
};

use crate::context::RequestContext;
use crate::query;

/// Creation form. Everything but `title` and `content` has a default.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAnnouncementRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub status: Option<String>,
    pub priority: Option<i32>,
    pub is_sticky: Option<bool>,
    pub publish_date: Option<DateTime<Utc>>,
    pub expire_date: Option<DateTime<Utc>>,
}

/// Partial edit. For the dates, an explicit `null` clears the value while
/// an absent field leaves it alone.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAnnouncementRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub status: Option<String>,
    pub priority: Option<i32>,
    pub is_sticky: Option<bool>,
    #[serde(default, deserialize_with = "nullable")]
    pub publish_date: Option<Option<DateTime<Utc>>>,
    #[serde(default, deserialize_with = "nullable")]
    pub expire_date: Option<Option<DateTime<Utc>>>,
}

/// Status-only edit.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: Option<String>,
}

fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// A user reference with the display name resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Author {
    pub id: Uuid,
    /// `None` once the account has been deleted.
    pub name: Option<String>,
}

/// An announcement with its creator and last editor resolved.
#[derive(Debug, Clone)]
pub struct AnnouncementDetail {
    pub announcement: Announcement,
    pub created_by: Author,
    pub updated_by: Author,
}

/// Handles announcement use cases.
#[derive(Debug, Clone)]
pub struct AnnouncementService {
    /// Announcement store.
    announcements: Arc<dyn AnnouncementStore>,
    /// Credential store, for author names.
    users: Arc<dyn UserStore>,
    /// RBAC enforcer.
    rbac: Arc<RbacEnforcer>,
}

impl AnnouncementService {
    /// Creates a new announcement service.
    pub fn new(
        announcements: Arc<dyn AnnouncementStore>,
        users: Arc<dyn UserStore>,
        rbac: Arc<RbacEnforcer>,
    ) -> Self {
        Self {
            announcements,
            users,
            rbac,
        }
    }

    /// Announcements currently visible to everyone. No authentication.
    pub async fn list_published(
        &self,
        params: &ListParams,
    ) -> AppResult<PageResponse<Announcement>> {
        let query = query::published_query(params, Utc::now())?;
        self.announcements.list_published(&query).await
    }

    /// Create an announcement authored by the caller.
    pub async fn create(
        &self,
        ctx: &RequestContext,
        req: CreateAnnouncementRequest,
    ) -> AppResult<AnnouncementDetail> {
        self.rbac.require(ctx.role(), Capability::ManageAnnouncements)?;

        let status = parse_status(req.status.as_deref())?.unwrap_or_default();
        let announcement = Announcement::create(
            NewAnnouncement {
                title: req.title.unwrap_or_default(),
                content: req.content.unwrap_or_default(),
                status,
                priority: req.priority.unwrap_or(0),
                is_sticky: req.is_sticky.unwrap_or(false),
                publish_date: req.publish_date,
                expire_date: req.expire_date,
                created_by: ctx.user_id(),
            },
            Uuid::new_v4(),
            ctx.request_time,
        )?;
        let announcement = self.announcements.create(&announcement).await?;

        info!(
            admin_id = %ctx.user_id(),
            announcement_id = %announcement.id,
            status = %announcement.status,
            "Announcement created"
        );
        self.detail(announcement).await
    }

    /// All announcements, filtered for administrators.
    pub async fn list(
        &self,
        ctx: &RequestContext,
        params: &ListParams,
    ) -> AppResult<PageResponse<AnnouncementDetail>> {
        self.rbac.require(ctx.role(), Capability::ManageAnnouncements)?;

        let query = query::announcement_query(params)?;
        let page = self.announcements.list(&query).await?;

        let mut ids: Vec<Uuid> = page
            .items
            .iter()
            .flat_map(|a| [a.created_by, a.updated_by])
            .collect();
        ids.sort_unstable();
        ids.dedup();
        let names = self.users.names_by_ids(&ids).await?;

        Ok(page.map(|a| with_authors(a, &names)))
    }

    /// One announcement by ID.
    pub async fn get(&self, ctx: &RequestContext, id: Uuid) -> AppResult<AnnouncementDetail> {
        self.rbac.require(ctx.role(), Capability::ManageAnnouncements)?;

        let announcement = self.find(id).await?;
        self.detail(announcement).await
    }

    /// Merge a partial edit, revalidate, and record the caller as editor.
    pub async fn update(
        &self,
        ctx: &RequestContext,
        id: Uuid,
        req: UpdateAnnouncementRequest,
    ) -> AppResult<AnnouncementDetail> {
        self.rbac.require(ctx.role(), Capability::ManageAnnouncements)?;

        let changes = AnnouncementChanges {
            title: req.title,
            content: req.content,
            status: parse_status(req.status.as_deref())?,
            priority: req.priority,
            is_sticky: req.is_sticky,
            publish_date: req.publish_date,
            expire_date: req.expire_date,
        };

        let mut announcement = self.find(id).await?;
        announcement.apply(changes, ctx.user_id(), ctx.request_time)?;
        let announcement = self.save(announcement).await?;

        info!(admin_id = %ctx.user_id(), announcement_id = %id, "Announcement updated");
        self.detail(announcement).await
    }

    /// Move an announcement to another status. The status is checked before
    /// anything is looked up.
    pub async fn update_status(
        &self,
        ctx: &RequestContext,
        id: Uuid,
        status: Option<&str>,
    ) -> AppResult<AnnouncementDetail> {
        self.rbac.require(ctx.role(), Capability::ManageAnnouncements)?;

        let status = parse_status(status)?
            .ok_or_else(|| AppError::validation("Please provide a status"))?;

        let mut announcement = self.find(id).await?;
        let from = announcement.status;
        announcement.transition_to(status, ctx.request_time);
        announcement.validate()?;
        announcement.touch(ctx.user_id(), ctx.request_time);
        let announcement = self.save(announcement).await?;

        info!(
            admin_id = %ctx.user_id(),
            announcement_id = %id,
            from = %from,
            to = %status,
            "Announcement status changed"
        );
        self.detail(announcement).await
    }

    /// Delete an announcement.
    pub async fn delete(&self, ctx: &RequestContext, id: Uuid) -> AppResult<()> {
        self.rbac.require(ctx.role(), Capability::ManageAnnouncements)?;

        if !self.announcements.delete(id).await? {
            return Err(not_found());
        }
        info!(admin_id = %ctx.user_id(), announcement_id = %id, "Announcement deleted");
        Ok(())
    }

    async fn find(&self, id: Uuid) -> AppResult<Announcement> {
        self.announcements
            .find_by_id(id)
            .await?
            .ok_or_else(not_found)
    }

    async fn save(&self, announcement: Announcement) -> AppResult<Announcement> {
        self.announcements
            .update(&announcement)
            .await?
            .ok_or_else(not_found)
    }

    async fn detail(&self, announcement: Announcement) -> AppResult<AnnouncementDetail> {
        let names = self
            .users
            .names_by_ids(&[announcement.created_by, announcement.updated_by])
            .await?;
        Ok(with_authors(announcement, &names))
    }
}

fn not_found() -> AppError {
    AppError::not_found("No announcement found with that ID")
}

/// Blank means "not given"; anything else must name a known status.
fn parse_status(value: Option<&str>) -> AppResult<Option<AnnouncementStatus>> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::parse)
        .transpose()
}

fn with_authors(announcement: Announcement, names: &HashMap<Uuid, String>) -> AnnouncementDetail {
    let author = |id: Uuid| Author {
        id,
        name: names.get(&id).cloned(),
    };
    AnnouncementDetail {
        created_by: author(announcement.created_by),
        updated_by: author(announcement.updated_by),
        announcement,
    }
}
