//! Admin user management handlers.
//!
//! Mounted behind the `require_manage_users` gate.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use uuid::Uuid;

use cherry_core::types::ListParams;
use cherry_service::user::AdminUpdateUserRequest;

use crate::dto::response::{ApiResponse, UserData, UsersData};
use crate::error::ApiError;
use crate::extractors::{ApiJson, ApiPath, ApiQuery, AuthUser};
use crate::state::AppState;

/// GET /admin/users
pub async fn list_users(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiQuery(params): ApiQuery<ListParams>,
) -> Result<Json<ApiResponse<UsersData>>, ApiError> {
    let page = state.admin_users.list_users(&auth, &params).await?;
    Ok(Json(ApiResponse::page(page, UsersData::from)))
}

/// GET /admin/users/{id}
pub async fn get_user(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<ApiResponse<UserData>>, ApiError> {
    let user = state.admin_users.get_user(&auth, id).await?;
    Ok(Json(ApiResponse::ok(user.into())))
}

/// PATCH /admin/users/{id}
pub async fn update_user(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(req): ApiJson<AdminUpdateUserRequest>,
) -> Result<Json<ApiResponse<UserData>>, ApiError> {
    let user = state.admin_users.update_user(&auth, id, req).await?;
    Ok(Json(ApiResponse::ok(user.into())))
}

/// DELETE /admin/users/{id}
pub async fn delete_user(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.admin_users.delete_user(&auth, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
