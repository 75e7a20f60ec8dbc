pub mod error;
pub mod routes;
pub mod sse;
pub mod state;

use axum::routing::{get, post, put};
use axum::Router;
use std::path::Path;
use tower_http::services::ServeDir;

use state::AppState;

pub fn create_router(state: AppState, static_dir: Option<&Path>) -> Router {
    let router = Router::new()
        .route("/api/complaints", post(routes::submit_complaint))
        .route("/api/complaints/search", get(routes::search_complaints))
        .route("/api/analyze", post(routes::analyze_text))
        .route("/api/admin/complaints", get(routes::list_complaints))
        .route("/api/admin/complaints/{id}", put(routes::update_complaint))
        .route("/api/admin/stats", get(routes::stats))
        .route("/api/admin/events", get(sse::sse_handler));

    let router = match static_dir {
        Some(dir) => router.nest_service("/static", ServeDir::new(dir)),
        None => router,
    };

    router.with_state(state)
}
