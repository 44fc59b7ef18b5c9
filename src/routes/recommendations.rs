use axum::{extract::State, Extension, Json};
use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    middleware::RequestId,
    models::{RecommendationRequest, RecommendationResponse},
    routes::AppState,
    services,
};

/// Handler for recommendation endpoints
pub async fn recommend(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    Json(request): Json<RecommendationRequest>,
) -> AppResult<Json<RecommendationResponse>> {
    let k = resolve_count(request.k, &state)?;

    tracing::info!(
        request_id = %request_id,
        seed_count = request.songs.len(),
        k,
        "Processing recommendation request"
    );

    let catalog = state.catalog.clone();
    let result = tokio::task::spawn_blocking(move || {
        services::recommend(&catalog, request.songs.as_slice(), k)
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))?;

    if !result.missing.is_empty() {
        tracing::info!(
            request_id = %request_id,
            missing = ?result.missing,
            "Some seed songs are not in the catalog"
        );
    }

    Ok(Json(result.into()))
}

fn resolve_count(requested: Option<usize>, state: &AppState) -> AppResult<usize> {
    let k = requested.unwrap_or(state.config.default_recommendations);
    if k > state.config.max_recommendations {
        return Err(AppError::InvalidInput(format!(
            "k must be at most {}",
            state.config.max_recommendations
        )));
    }
    Ok(k)
}
