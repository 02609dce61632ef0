use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    http::{header, Method, StatusCode},
    middleware,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    config::Config,
    middleware::request_id::{make_span_with_request_id, request_id_middleware},
    services::{GeminiProvider, GenerativeProvider},
};

pub mod recommendations;

/// Path the composer posts to
pub const RECOMMENDATIONS_PATH: &str = "/api/getRecommendations";

/// Shared, read-only gateway state
pub struct AppState {
    pub provider: Arc<dyn GenerativeProvider>,
    pub max_body_bytes: usize,
}

impl AppState {
    pub fn new(provider: Arc<dyn GenerativeProvider>, max_body_bytes: usize) -> Self {
        Self {
            provider,
            max_body_bytes,
        }
    }

    /// Wires the live Gemini provider from configuration
    pub fn from_config(config: &Config) -> Self {
        Self::new(Arc::new(GeminiProvider::new(config)), config.max_body_bytes)
    }
}

/// Creates the application router with all routes
pub fn create_router(state: Arc<AppState>) -> Router {
    let body_limit = state.max_body_bytes;

    Router::new()
        .route("/health", get(health_check))
        .route(
            RECOMMENDATIONS_PATH,
            post(recommendations::recommend).fallback(recommendations::method_not_allowed),
        )
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
                .layer(cors_layer())
                .layer(DefaultBodyLimit::max(body_limit)),
        )
}

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::POST])
        .allow_headers([header::CONTENT_TYPE])
}

/// Health check endpoint
async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}
