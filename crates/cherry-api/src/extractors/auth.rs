//! `AuthUser` extractor: verifies the bearer token and loads the caller.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use cherry_core::error::AppError;
use cherry_service::context::RequestContext;

use crate::error::ApiError;
use crate::state::AppState;

/// Message for requests that carry no usable credential.
pub const NOT_LOGGED_IN_MESSAGE: &str = "You are not logged in. Please log in to get access.";

/// Extracted authenticated user context available in handlers.
#[derive(Debug, Clone)]
pub struct AuthUser(pub RequestContext);

impl AuthUser {
    /// Returns the inner `RequestContext`.
    pub fn context(&self) -> &RequestContext {
        &self.0
    }
}

impl std::ops::Deref for AuthUser {
    type Target = RequestContext;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// The token from an `Authorization: Bearer <token>` header.
fn bearer_token(parts: &Parts) -> Option<&str> {
    let value = parts.headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // Already resolved by a gate middleware on this route.
        if let Some(ctx) = parts.extensions.get::<RequestContext>() {
            return Ok(AuthUser(ctx.clone()));
        }

        let token =
            bearer_token(parts).ok_or_else(|| AppError::authentication(NOT_LOGGED_IN_MESSAGE))?;
        let ctx = state.auth.authenticate(token).await?;

        parts.extensions.insert(ctx.clone());
        Ok(AuthUser(ctx))
    }
}
