//! Announcement repository implementation.

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use cherry_core::error::{AppError, ErrorKind};
use cherry_core::result::AppResult;
use cherry_core::types::PageResponse;
use cherry_entity::announcement::{Announcement, AnnouncementQuery, PublishedQuery};

use crate::store::{AnnouncementStore, escape_like};

const VISIBLE_CLAUSE: &str = "status = 'published' AND publish_date <= $1 \
                              AND (expire_date IS NULL OR expire_date > $1)";

/// PostgreSQL-backed announcement store.
#[derive(Debug, Clone)]
pub struct AnnouncementRepository {
    pool: PgPool,
}

impl AnnouncementRepository {
    /// Create a new announcement repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn push_filters(qb: &mut QueryBuilder<'_, Postgres>, query: &AnnouncementQuery) {
    if let Some(search) = &query.search {
        let pattern = format!("%{}%", escape_like(search));
        qb.push(" AND (title ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR content ILIKE ")
            .push_bind(pattern)
            .push(")");
    }
    if let Some(status) = query.status {
        qb.push(" AND status = ").push_bind(status);
    }
    if let Some(from) = query.created.from {
        qb.push(" AND created_at >= ").push_bind(from);
    }
    if let Some(to) = query.created.to {
        qb.push(" AND created_at <= ").push_bind(to);
    }
}

#[async_trait]
impl AnnouncementStore for AnnouncementRepository {
    async fn create(&self, a: &Announcement) -> AppResult<Announcement> {
        sqlx::query_as::<_, Announcement>(
            "INSERT INTO announcements (id, title, content, status, priority, is_sticky, \
             publish_date, expire_date, created_by, updated_by, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12) \
             RETURNING *",
        )
        .bind(a.id)
        .bind(&a.title)
        .bind(&a.content)
        .bind(a.status)
        .bind(a.priority)
        .bind(a.is_sticky)
        .bind(a.publish_date)
        .bind(a.expire_date)
        .bind(a.created_by)
        .bind(a.updated_by)
        .bind(a.created_at)
        .bind(a.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create announcement", e))
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Announcement>> {
        sqlx::query_as::<_, Announcement>("SELECT * FROM announcements WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find announcement", e)
            })
    }

    async fn update(&self, a: &Announcement) -> AppResult<Option<Announcement>> {
        sqlx::query_as::<_, Announcement>(
            "UPDATE announcements SET title = $2, content = $3, status = $4, priority = $5, \
             is_sticky = $6, publish_date = $7, expire_date = $8, updated_by = $9, \
             updated_at = $10 \
             WHERE id = $1 RETURNING *",
        )
        .bind(a.id)
        .bind(&a.title)
        .bind(&a.content)
        .bind(a.status)
        .bind(a.priority)
        .bind(a.is_sticky)
        .bind(a.publish_date)
        .bind(a.expire_date)
        .bind(a.updated_by)
        .bind(a.updated_at)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update announcement", e))
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM announcements WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to delete announcement", e)
            })?;
        Ok(result.rows_affected() > 0)
    }

    async fn list(&self, query: &AnnouncementQuery) -> AppResult<PageResponse<Announcement>> {
        let mut count =
            QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM announcements WHERE TRUE");
        push_filters(&mut count, query);
        let total = count
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to count announcements", e)
            })?;

        let mut select = QueryBuilder::<Postgres>::new("SELECT * FROM announcements WHERE TRUE");
        push_filters(&mut select, query);
        select
            .push(format!(
                " ORDER BY {} {}, id ASC",
                query.sort.key.as_column(),
                query.sort.direction.as_sql()
            ))
            .push(" LIMIT ")
            .push_bind(query.page.limit as i64)
            .push(" OFFSET ")
            .push_bind(query.page.offset() as i64);

        let items = select
            .build_query_as::<Announcement>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to list announcements", e)
            })?;

        Ok(PageResponse::new(items, &query.page, total as u64))
    }

    async fn list_published(
        &self,
        query: &PublishedQuery,
    ) -> AppResult<PageResponse<Announcement>> {
        let total: i64 = sqlx::query_scalar(&format!(
            "SELECT COUNT(*) FROM announcements WHERE {VISIBLE_CLAUSE}"
        ))
        .bind(query.now)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to count published announcements", e)
        })?;

        let items = sqlx::query_as::<_, Announcement>(&format!(
            "SELECT * FROM announcements WHERE {VISIBLE_CLAUSE} \
             ORDER BY is_sticky DESC, priority DESC, publish_date DESC \
             LIMIT $2 OFFSET $3"
        ))
        .bind(query.now)
        .bind(query.page.limit as i64)
        .bind(query.page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list published announcements", e)
        })?;

        Ok(PageResponse::new(items, &query.page, total as u64))
    }
}
