pub mod auth;
pub mod handlers;
pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post, put},
    Router,
};

use crate::state::AppState;

/// Room for multipart boundaries and headers on top of the file itself.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes + MULTIPART_OVERHEAD_BYTES;

    Router::new()
        .route("/health", get(health::health_handler))
        // Admin session
        .route(
            "/api/v1/session",
            post(handlers::handle_login).delete(handlers::handle_logout),
        )
        // Listing
        .route("/api/v1/resumes", get(handlers::handle_dashboard))
        .route("/api/v1/resumes/refresh", post(handlers::handle_refresh))
        .route(
            "/api/v1/resumes/:id/download",
            get(handlers::handle_download),
        )
        // Detail panel
        .route(
            "/api/v1/selection",
            get(handlers::handle_current_selection).delete(handlers::handle_deselect),
        )
        .route("/api/v1/selection/:id", put(handlers::handle_select))
        // Public upload page
        .route("/api/v1/uploads", post(handlers::handle_upload))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}
