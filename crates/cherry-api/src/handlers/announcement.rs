//! Announcement handlers. Everything except the published feed sits behind
//! the `require_manage_announcements` gate.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use uuid::Uuid;

use cherry_core::types::ListParams;
use cherry_service::announcement::{
    AnnouncementDetail, CreateAnnouncementRequest, UpdateAnnouncementRequest, UpdateStatusRequest,
};

use crate::dto::response::{
    AnnouncementData, AnnouncementResponse, AnnouncementsData, ApiResponse,
    PublishedAnnouncementResponse,
};
use crate::error::ApiError;
use crate::extractors::{ApiJson, ApiPath, ApiQuery, AuthUser};
use crate::state::AppState;

type AdminView = AnnouncementData<AnnouncementResponse>;

fn admin_view(detail: AnnouncementDetail) -> ApiResponse<AdminView> {
    ApiResponse::ok(AnnouncementData {
        announcement: detail.into(),
    })
}

/// GET /announcements/published
pub async fn list_published(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<ListParams>,
) -> Result<Json<ApiResponse<AnnouncementsData<PublishedAnnouncementResponse>>>, ApiError> {
    let page = state.announcements.list_published(&params).await?;
    Ok(Json(ApiResponse::page(page, AnnouncementsData::from)))
}

/// POST /announcements
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(req): ApiJson<CreateAnnouncementRequest>,
) -> Result<(StatusCode, Json<ApiResponse<AdminView>>), ApiError> {
    let detail = state.announcements.create(&auth, req).await?;
    Ok((StatusCode::CREATED, Json(admin_view(detail))))
}

/// GET /announcements
pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiQuery(params): ApiQuery<ListParams>,
) -> Result<Json<ApiResponse<AnnouncementsData<AnnouncementResponse>>>, ApiError> {
    let page = state.announcements.list(&auth, &params).await?;
    Ok(Json(ApiResponse::page(page, AnnouncementsData::from)))
}

/// GET /announcements/{id}
pub async fn get(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<ApiResponse<AdminView>>, ApiError> {
    let detail = state.announcements.get(&auth, id).await?;
    Ok(Json(admin_view(detail)))
}

/// PATCH /announcements/{id}
pub async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(req): ApiJson<UpdateAnnouncementRequest>,
) -> Result<Json<ApiResponse<AdminView>>, ApiError> {
    let detail = state.announcements.update(&auth, id, req).await?;
    Ok(Json(admin_view(detail)))
}

/// PATCH /announcements/{id}/status
pub async fn update_status(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(req): ApiJson<UpdateStatusRequest>,
) -> Result<Json<ApiResponse<AdminView>>, ApiError> {
    let detail = state
        .announcements
        .update_status(&auth, id, req.status.as_deref())
        .await?;
    Ok(Json(admin_view(detail)))
}

/// DELETE /announcements/{id}
pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.announcements.delete(&auth, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
