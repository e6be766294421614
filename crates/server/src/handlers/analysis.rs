//! # Analysis Handlers
//!
//! Submit lyrics for analysis, fetch a stored analysis by id, and list the
//! most recent analyses.

use super::{AppError, AppState};
use crate::types::RecentParams;
use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    Json,
};
use lyricsense::{AnalysisError, FieldError, LyricsAnalysis};
use serde_json::Value;
use tracing::info;

/// The handler for `POST /api/analyze`.
///
/// The body is taken as raw JSON so that shape errors are reported by the
/// validator as field-level 400s rather than by the extractor.
pub async fn analyze_handler(
    State(app_state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<LyricsAnalysis>, AppError> {
    let Json(payload) = payload.map_err(|rejection| {
        AnalysisError::Validation(vec![FieldError {
            path: Vec::new(),
            message: rejection.body_text(),
        }])
    })?;

    let outcome = app_state.analyzer.analyze(&payload).await?;
    info!(
        id = outcome.analysis.id,
        cached = outcome.cached,
        "Analyze request completed."
    );
    Ok(Json(outcome.analysis))
}

/// The handler for `GET /api/analysis/{id}`.
pub async fn get_analysis_handler(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<LyricsAnalysis>, AppError> {
    let not_found = || AppError::NotFound("Analysis not found".to_string());
    let id: i64 = id.parse().map_err(|_| not_found())?;
    let analysis = app_state.analyzer.get_by_id(id).await.ok_or_else(not_found)?;
    Ok(Json(analysis))
}

/// The handler for `GET /api/recent?limit=N`.
pub async fn recent_handler(
    State(app_state): State<AppState>,
    Query(params): Query<RecentParams>,
) -> Json<Vec<LyricsAnalysis>> {
    let analyses = app_state.analyzer.get_recent(params.limit()).await;
    info!(count = analyses.len(), "Returning recent analyses.");
    Json(analyses)
}
