use axum::extract::DefaultBodyLimit;
use axum::{
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;

use super::handlers::*;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/project", get(get_projection))
        .route("/api/unproject", get(get_unprojection))
        .route("/api/upload", post(upload_csv))
        .route("/api/share", get(get_share))
        .route("/api/analyze", get(get_analysis))
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(DefaultBodyLimit::max(100 * 1024 * 1024)) // 100MB limit
                .layer(CorsLayer::permissive()),
        )
}
