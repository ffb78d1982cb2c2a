//! Router configuration for the HTTP API.

use axum::{http::StatusCode, middleware, routing::get, Router};
use std::path::Path;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::compression::CompressionLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use super::handlers::{
    create_reply, create_thread, delete_reply, delete_thread, get_thread, list_threads,
    report_reply, report_thread, AppState,
};
use super::middleware::{create_cors_layer, security_headers};
use crate::config::WebConfig;

/// Create the main API router.
pub fn create_router(app_state: Arc<AppState>, web_config: &WebConfig) -> Router {
    let api_routes = Router::new()
        .route(
            "/threads/:board",
            get(list_threads)
                .post(create_thread)
                .put(report_thread)
                .delete(delete_thread),
        )
        .route(
            "/replies/:board",
            get(get_thread)
                .post(create_reply)
                .put(report_reply)
                .delete(delete_reply),
        );

    let mut router = Router::new()
        .nest("/api", api_routes)
        .merge(create_health_router::<Arc<AppState>>());

    if web_config.serve_static {
        let static_path = Path::new(&web_config.static_path);
        if static_path.exists() {
            tracing::info!("Serving static files from {:?}", static_path);
            router = router.nest_service("/public", ServeDir::new(static_path));
        } else {
            tracing::warn!(
                "Static file path {:?} does not exist, skipping static serving",
                static_path
            );
        }
    }

    router
        .fallback(not_found)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(create_cors_layer(&web_config.cors_origins))
                .layer(middleware::from_fn(security_headers)),
        )
        .layer(CompressionLayer::new())
        .with_state(app_state)
}

/// Create a health check router.
pub fn create_health_router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new().route("/health", get(health_check))
}

/// Health check handler.
async fn health_check() -> &'static str {
    "OK"
}

/// Fallback for unknown routes.
async fn not_found() -> (StatusCode, &'static str) {
    (StatusCode::NOT_FOUND, "Not Found")
}
