//! Route definitions for the Cherry Studio HTTP API.
//!
//! Resource routes are mounted under `server.api_prefix`. The router
//! receives `AppState` and passes it to all handlers via Axum's `State`
//! extractor.

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{delete, get, patch, post},
};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use cherry_core::config::StorageProviderKind;

use crate::error::{not_found, panic_response};
use crate::handlers;
use crate::middleware;
use crate::middleware::compression::build_compression_layer;
use crate::middleware::cors::build_cors_layer;
use crate::state::AppState;

/// Room for multipart boundaries and headers on top of the avatar itself.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let config = state.config.clone();
    let body_limit = usize::try_from(config.storage.max_avatar_bytes)
        .unwrap_or(usize::MAX)
        .saturating_add(MULTIPART_OVERHEAD);

    let api_routes = Router::new()
        .merge(health_routes())
        .nest("/auth", auth_routes())
        .nest("/admin", admin_routes(&state))
        .nest("/announcements", announcement_routes(&state));

    let prefix = config.server.normalized_prefix();
    let mut router = Router::new().route("/", get(handlers::health::root));
    router = if prefix.is_empty() {
        router.merge(api_routes)
    } else {
        router.nest(prefix, api_routes)
    };

    if config.storage.provider == StorageProviderKind::Local {
        let mount = config.storage.local.public_base_url.trim_end_matches('/');
        if mount.starts_with('/') && mount.len() > 1 {
            router = router.nest_service(mount, ServeDir::new(&config.storage.local.root_path));
        }
    }

    router
        .fallback(not_found)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(axum_middleware::from_fn(
            middleware::logging::request_logging,
        ))
        .layer(build_compression_layer())
        .layer(build_cors_layer(&config.server.cors))
        .layer(TraceLayer::new_for_http())
        .layer(CatchPanicLayer::custom(panic_response))
        .with_state(state)
}

/// Health check
fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}

/// Sign-up, sign-in, password recovery, and self-service
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login))
        .route("/me", get(handlers::auth::me))
        .route("/forgot-password", post(handlers::auth::forgot_password))
        .route(
            "/reset-password/{token}",
            post(handlers::auth::reset_password),
        )
        .route("/update-profile", patch(handlers::auth::update_profile))
        .route("/update-password", patch(handlers::auth::update_password))
        .route("/upload-avatar", post(handlers::auth::upload_avatar))
        .route("/deactivate", delete(handlers::auth::deactivate))
}

/// Admin user management
fn admin_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/users", get(handlers::admin::list_users))
        .route(
            "/users/{id}",
            get(handlers::admin::get_user)
                .patch(handlers::admin::update_user)
                .delete(handlers::admin::delete_user),
        )
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::rbac::require_manage_users,
        ))
}

/// Public feed plus admin management
fn announcement_routes(state: &AppState) -> Router<AppState> {
    let managed = Router::new()
        .route(
            "/",
            get(handlers::announcement::list).post(handlers::announcement::create),
        )
        .route(
            "/{id}",
            get(handlers::announcement::get)
                .patch(handlers::announcement::update)
                .delete(handlers::announcement::delete),
        )
        .route(
            "/{id}/status",
            patch(handlers::announcement::update_status),
        )
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::rbac::require_manage_announcements,
        ));

    Router::new()
        .route(
            "/published",
            get(handlers::announcement::list_published),
        )
        .merge(managed)
}
