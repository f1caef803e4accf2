//! Response DTOs.
//!
//! Every success body shares one envelope:
//! `{status, token?, message?, results?, pagination?, data?}`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use cherry_core::types::PageResponse;
use cherry_entity::announcement::{Announcement, AnnouncementStatus};
use cherry_entity::user::{User, UserRole};
use cherry_service::announcement::{AnnouncementDetail, Author};

/// Standard success response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Always `"success"`.
    pub status: String,
    /// Fresh identity token, for operations that sign the caller in.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Number of items in this page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub results: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    fn empty() -> Self {
        Self {
            status: "success".to_string(),
            token: None,
            message: None,
            results: None,
            pagination: None,
            data: None,
        }
    }

    /// A body carrying `data`.
    pub fn ok(data: T) -> Self {
        Self {
            data: Some(data),
            ..Self::empty()
        }
    }

    /// A page of results, with `wrap` naming the collection inside `data`.
    pub fn page<U>(page: PageResponse<U>, wrap: impl FnOnce(Vec<U>) -> T) -> Self {
        Self {
            results: Some(page.items.len()),
            pagination: Some(Pagination {
                total: page.total,
                page: page.page,
                pages: page.pages,
                limit: page.limit,
            }),
            data: Some(wrap(page.items)),
            ..Self::empty()
        }
    }

    /// Attach an identity token.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }
}

impl ApiResponse<()> {
    /// A body carrying only a message.
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..Self::empty()
        }
    }
}

/// Page metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub total: u64,
    pub page: u64,
    pub pages: u64,
    pub limit: u64,
}

/// Public view of an account. Credentials and reset state never leave the
/// server.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub role: UserRole,
    pub avatar: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
            role: user.role,
            avatar: user.avatar,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserData {
    pub user: UserResponse,
}

impl From<User> for UserData {
    fn from(user: User) -> Self {
        Self { user: user.into() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsersData {
    pub users: Vec<UserResponse>,
}

impl From<Vec<User>> for UsersData {
    fn from(users: Vec<User>) -> Self {
        Self {
            users: users.into_iter().map(UserResponse::from).collect(),
        }
    }
}

/// Announcement as shown on the public feed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishedAnnouncementResponse {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub status: AnnouncementStatus,
    pub priority: i32,
    pub is_sticky: bool,
    pub publish_date: Option<DateTime<Utc>>,
    pub expire_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Announcement> for PublishedAnnouncementResponse {
    fn from(a: Announcement) -> Self {
        Self {
            id: a.id,
            title: a.title,
            content: a.content,
            status: a.status,
            priority: a.priority,
            is_sticky: a.is_sticky,
            publish_date: a.publish_date,
            expire_date: a.expire_date,
            created_at: a.created_at,
            updated_at: a.updated_at,
        }
    }
}

/// Author reference on admin views.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorResponse {
    pub id: Uuid,
    pub name: Option<String>,
}

impl From<Author> for AuthorResponse {
    fn from(author: Author) -> Self {
        Self {
            id: author.id,
            name: author.name,
        }
    }
}

/// Announcement as shown to administrators.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnouncementResponse {
    #[serde(flatten)]
    pub announcement: PublishedAnnouncementResponse,
    pub created_by: AuthorResponse,
    pub updated_by: AuthorResponse,
}

impl From<AnnouncementDetail> for AnnouncementResponse {
    fn from(detail: AnnouncementDetail) -> Self {
        Self {
            announcement: detail.announcement.into(),
            created_by: detail.created_by.into(),
            updated_by: detail.updated_by.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnnouncementData<A> {
    pub announcement: A,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnnouncementsData<A> {
    pub announcements: Vec<A>,
}

impl<A, S: Into<A>> From<Vec<S>> for AnnouncementsData<A> {
    fn from(items: Vec<S>) -> Self {
        Self {
            announcements: items.into_iter().map(Into::into).collect(),
        }
    }
}

/// Store and storage reachability.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub database: bool,
    pub storage: bool,
    pub version: String,
}
