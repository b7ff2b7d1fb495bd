use std::sync::Arc;
use std::time::Duration;

use axum::{
    http::StatusCode,
    middleware,
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    middleware::current_user::{current_user_middleware, make_span_with_user},
    services::RecommendationEngine,
};

pub mod feedback;
pub mod recommendations;

/// Shared application state
pub struct AppState {
    pub engine: Arc<RecommendationEngine>,
    /// Upper bound on one recommendation request before it is cancelled
    pub request_timeout: Duration,
}

impl AppState {
    pub fn new(engine: RecommendationEngine, request_timeout: Duration) -> Self {
        Self {
            engine: Arc::new(engine),
            request_timeout,
        }
    }
}

/// Creates the application router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", api_routes())
        .layer(TraceLayer::new_for_http().make_span_with(make_span_with_user))
        .layer(CorsLayer::permissive())
        .with_state(Arc::new(state))
}

/// API routes under /api/v1, all scoped to the current user
fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/recommendations", get(recommendations::recommend))
        .route(
            "/recommendations/feedback",
            get(feedback::list).post(feedback::submit),
        )
        .layer(middleware::from_fn(current_user_middleware))
}

/// Health check endpoint
async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}
