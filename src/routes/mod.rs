use axum::{extract::State, http::StatusCode, middleware, routing::get, Json, Router};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    middleware::request_id::{make_span_with_request_id, request_id_middleware},
    services::recommendations::Recommender,
};

pub mod recommendations;

/// Shared, read-only application state
pub struct AppState {
    pub recommender: Recommender,
    /// Number of titles returned per request
    pub recommendation_count: usize,
}

impl AppState {
    pub fn new(recommender: Recommender, recommendation_count: usize) -> Self {
        Self {
            recommender,
            recommendation_count,
        }
    }
}

/// Creates the application router with all routes
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route(
            "/getRecommendations",
            get(recommendations::get_recommendations),
        )
        .layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

/// Health check endpoint
async fn health_check(State(state): State<Arc<AppState>>) -> (StatusCode, Json<Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "catalog_size": state.recommender.catalog().len(),
            "model": state.recommender.model_name(),
        })),
    )
}
