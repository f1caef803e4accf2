//! Route guards that require a capability before the handler runs.
//!
//! Applied with `route_layer(from_fn_with_state(..))`. The resolved caller is
//! left in the request extensions, so the handler's `AuthUser` does not hit
//! the store a second time.

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;

use cherry_auth::Capability;

use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

async fn require(
    state: &AppState,
    auth: &AuthUser,
    capability: Capability,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    state.auth.authorize(auth, capability)?;
    Ok(next.run(request).await)
}

/// Admin user management.
pub async fn require_manage_users(
    State(state): State<AppState>,
    auth: AuthUser,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    require(&state, &auth, Capability::ManageUsers, request, next).await
}

/// Announcement management.
pub async fn require_manage_announcements(
    State(state): State<AppState>,
    auth: AuthUser,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    require(&state, &auth, Capability::ManageAnnouncements, request, next).await
}
