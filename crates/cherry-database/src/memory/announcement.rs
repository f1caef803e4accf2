//! In-memory announcement store.

use std::cmp::Ordering;
use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use cherry_core::result::AppResult;
use cherry_core::types::{PageRequest, PageResponse};
use cherry_entity::announcement::{
    Announcement, AnnouncementQuery, AnnouncementSortKey, PublishedQuery,
};

use crate::store::AnnouncementStore;

/// Announcement store kept in process memory.
#[derive(Debug, Default)]
pub struct MemoryAnnouncementStore {
    items: RwLock<HashMap<Uuid, Announcement>>,
}

impl MemoryAnnouncementStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

/// Order optional timestamps the way PostgreSQL does: NULL sorts as the
/// largest value.
fn cmp_nulls_high(a: Option<DateTime<Utc>>, b: Option<DateTime<Utc>>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
    }
}

fn compare(a: &Announcement, b: &Announcement, key: AnnouncementSortKey) -> Ordering {
    match key {
        AnnouncementSortKey::CreatedAt => a.created_at.cmp(&b.created_at),
        AnnouncementSortKey::UpdatedAt => a.updated_at.cmp(&b.updated_at),
        AnnouncementSortKey::Title => a.title.cmp(&b.title),
        AnnouncementSortKey::Status => a.status.ordinal().cmp(&b.status.ordinal()),
        AnnouncementSortKey::Priority => a.priority.cmp(&b.priority),
        AnnouncementSortKey::PublishDate => cmp_nulls_high(a.publish_date, b.publish_date),
        AnnouncementSortKey::ExpireDate => cmp_nulls_high(a.expire_date, b.expire_date),
    }
}

fn is_match(a: &Announcement, query: &AnnouncementQuery) -> bool {
    if let Some(search) = &query.search {
        let needle = search.to_lowercase();
        if !a.title.to_lowercase().contains(&needle) && !a.content.to_lowercase().contains(&needle)
        {
            return false;
        }
    }
    query.status.is_none_or(|s| a.status == s) && query.created.contains(a.created_at)
}

fn page_of(sorted: Vec<&Announcement>, page: &PageRequest) -> PageResponse<Announcement> {
    let total = sorted.len() as u64;
    let items = sorted
        .into_iter()
        .skip(page.offset() as usize)
        .take(page.limit as usize)
        .cloned()
        .collect();
    PageResponse::new(items, page, total)
}

#[async_trait]
impl AnnouncementStore for MemoryAnnouncementStore {
    async fn create(&self, announcement: &Announcement) -> AppResult<Announcement> {
        self.items
            .write()
            .await
            .insert(announcement.id, announcement.clone());
        Ok(announcement.clone())
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Announcement>> {
        Ok(self.items.read().await.get(&id).cloned())
    }

    async fn update(&self, announcement: &Announcement) -> AppResult<Option<Announcement>> {
        let mut items = self.items.write().await;
        Ok(items.get_mut(&announcement.id).map(|stored| {
            *stored = announcement.clone();
            stored.clone()
        }))
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        Ok(self.items.write().await.remove(&id).is_some())
    }

    async fn list(&self, query: &AnnouncementQuery) -> AppResult<PageResponse<Announcement>> {
        let items = self.items.read().await;
        let mut matched: Vec<&Announcement> =
            items.values().filter(|a| is_match(a, query)).collect();
        matched.sort_by(|a, b| {
            query
                .sort
                .direction
                .apply(compare(a, b, query.sort.key))
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(page_of(matched, &query.page))
    }

    async fn list_published(
        &self,
        query: &PublishedQuery,
    ) -> AppResult<PageResponse<Announcement>> {
        let items = self.items.read().await;
        let mut visible: Vec<&Announcement> = items
            .values()
            .filter(|a| a.is_visible_at(query.now))
            .collect();
        visible.sort_by(|a, b| {
            b.is_sticky
                .cmp(&a.is_sticky)
                .then_with(|| b.priority.cmp(&a.priority))
                .then_with(|| b.publish_date.cmp(&a.publish_date))
        });
        Ok(page_of(visible, &query.page))
    }
}
