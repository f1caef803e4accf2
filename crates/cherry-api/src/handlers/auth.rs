//! Auth handlers: sign-up, sign-in, password recovery, and self-service.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

use cherry_core::error::AppError;
use cherry_service::AuthSession;
use cherry_service::auth::{LoginRequest, RegisterRequest, UpdatePasswordRequest};
use cherry_service::user::{AvatarUpload, UpdateProfileRequest};

use crate::dto::request::{EmailRequest, PasswordRequest};
use crate::dto::response::{ApiResponse, UserData};
use crate::error::ApiError;
use crate::extractors::{ApiJson, ApiMultipart, ApiPath, AuthUser};
use crate::state::AppState;

/// Multipart field carrying the avatar image.
pub const AVATAR_FIELD: &str = "avatar";

fn signed_in(session: AuthSession) -> ApiResponse<UserData> {
    ApiResponse::ok(UserData::from(session.user)).with_token(session.token)
}

fn signed_in_with_message(session: AuthSession, message: &str) -> ApiResponse<()> {
    ApiResponse::message(message).with_token(session.token)
}

/// POST /auth/register
pub async fn register(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<RegisterRequest>,
) -> Result<(StatusCode, Json<ApiResponse<UserData>>), ApiError> {
    let session = state.auth.register(req).await?;
    Ok((StatusCode::CREATED, Json(signed_in(session))))
}

/// POST /auth/login
pub async fn login(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> Result<Json<ApiResponse<UserData>>, ApiError> {
    let session = state.auth.login(req).await?;
    Ok(Json(signed_in(session)))
}

/// GET /auth/me
pub async fn me(auth: AuthUser) -> Json<ApiResponse<UserData>> {
    Json(ApiResponse::ok(UserData::from(auth.0.user)))
}

/// POST /auth/forgot-password
pub async fn forgot_password(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<EmailRequest>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    state.auth.forgot_password(req.email.as_deref()).await?;
    Ok(Json(ApiResponse::message(
        "Password reset link sent to your email",
    )))
}

/// POST /auth/reset-password/{token}
pub async fn reset_password(
    State(state): State<AppState>,
    ApiPath(token): ApiPath<String>,
    ApiJson(req): ApiJson<PasswordRequest>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let session = state
        .auth
        .reset_password(&token, req.password.as_deref())
        .await?;
    Ok(Json(signed_in_with_message(
        session,
        "Password reset successful",
    )))
}

/// PATCH /auth/update-profile
pub async fn update_profile(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(req): ApiJson<UpdateProfileRequest>,
) -> Result<Json<ApiResponse<UserData>>, ApiError> {
    let user = state.users.update_profile(&auth, req).await?;
    Ok(Json(ApiResponse::ok(user.into())))
}

/// PATCH /auth/update-password
pub async fn update_password(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(req): ApiJson<UpdatePasswordRequest>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let session = state.auth.update_password(&auth, req).await?;
    Ok(Json(signed_in_with_message(
        session,
        "Password updated successfully",
    )))
}

/// POST /auth/upload-avatar
pub async fn upload_avatar(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiMultipart(mut multipart): ApiMultipart,
) -> Result<Json<ApiResponse<UserData>>, ApiError> {
    let mut upload = None;
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(AVATAR_FIELD) {
            continue;
        }
        let file_name = field.file_name().map(str::to_string);
        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let data = field.bytes().await?;
        upload = Some(AvatarUpload {
            file_name,
            content_type,
            data,
        });
        break;
    }
    let upload = upload
        .ok_or_else(|| AppError::validation("Please choose an avatar file to upload"))?;

    let user = state.users.upload_avatar(&auth, upload).await?;
    Ok(Json(ApiResponse::ok(user.into())))
}

/// DELETE /auth/deactivate
pub async fn deactivate(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(req): ApiJson<PasswordRequest>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    state.users.deactivate(&auth, req.password.as_deref()).await?;
    Ok(Json(ApiResponse::message("Your account has been deleted")))
}
