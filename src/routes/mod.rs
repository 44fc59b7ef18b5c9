use axum::{
    extract::State,
    http::{HeaderValue, StatusCode},
    middleware,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    catalog::Catalog,
    config::Config,
    middleware::{make_span_with_request_id, request_id_middleware},
    models::FeatureVector,
};

pub mod recommendations;
pub mod songs;

/// Shared, read-only application state
pub struct AppState {
    pub catalog: Arc<Catalog>,
    pub config: Config,
    /// Catalog-wide feature means, computed once
    pub feature_means: FeatureVector,
}

impl AppState {
    pub fn new(catalog: Catalog, config: Config) -> Self {
        let feature_means = catalog.feature_means();
        Self {
            catalog: Arc::new(catalog),
            config,
            feature_means,
        }
    }
}

/// Creates the application router with all routes
pub fn create_router(state: Arc<AppState>) -> Router {
    let cors = cors_layer(&state.config);

    Router::new()
        .route("/", get(welcome))
        .route("/health", get(health_check))
        // Path used by the web frontend
        .route("/recommend", post(recommendations::recommend))
        .nest("/api/v1", api_routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(cors)
}

/// API routes under /api/v1
fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/recommendations", post(recommendations::recommend))
        .route("/songs/search", get(songs::search))
        .route("/songs/features", get(songs::features))
}

fn cors_layer(config: &Config) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    match config.cors_origins() {
        Some(origins) => {
            let origins: Vec<HeaderValue> = origins
                .iter()
                .filter_map(|origin| match origin.parse() {
                    Ok(value) => Some(value),
                    Err(_) => {
                        tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                        None
                    }
                })
                .collect();
            layer.allow_origin(origins)
        }
        None => layer.allow_origin(Any),
    }
}

async fn welcome() -> Json<Value> {
    Json(json!({ "message": "Welcome to the Music Recommendation API" }))
}

/// Health check endpoint
async fn health_check(State(state): State<Arc<AppState>>) -> (StatusCode, Json<Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "songs": state.catalog.len(),
            "loaded_at": state.catalog.loaded_at(),
        })),
    )
}
