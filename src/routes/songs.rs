use axum::{
    extract::{Query, State},
    Json,
};
use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    models::{FeatureComparison, FeatureQuery, SongDetails, SongQuery},
    routes::AppState,
};

/// Looks up the latest release of a title
pub async fn search(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SongQuery>,
) -> AppResult<Json<SongDetails>> {
    let entry = state
        .catalog
        .find_latest(&params.q)
        .ok_or_else(|| AppError::NotFound(format!("Song '{}' not found", params.q.trim())))?;

    Ok(Json(SongDetails::from(entry)))
}

/// Song features next to the catalog-wide averages
pub async fn features(
    State(state): State<Arc<AppState>>,
    Query(params): Query<FeatureQuery>,
) -> AppResult<Json<FeatureComparison>> {
    let entry = state
        .catalog
        .find_latest(&params.name)
        .ok_or_else(|| AppError::NotFound(format!("Song '{}' not found", params.name.trim())))?;

    Ok(Json(FeatureComparison::new(entry, &state.feature_means)))
}
