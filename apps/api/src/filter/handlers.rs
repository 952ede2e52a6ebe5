use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    Json,
};
use chrono::Utc;
use serde::Serialize;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::filter::engine::matches;
use crate::filter::sort::{sort_records, SortParams};
use crate::filter::{
    FilterDimension, FilterOptions, FilterSession, FilterState, FilterUpdate, FilteredView,
};
use crate::models::ResumeRecord;
use crate::state::AppState;
use crate::stats::{compute_stats, DatasetStats};

#[derive(Debug, Serialize)]
pub struct FilterSummary {
    pub state: FilterState,
    pub active_filters: usize,
    pub active_dimensions: Vec<FilterDimension>,
    /// A debounced evaluation has not published yet.
    pub pending: bool,
}

impl FilterSummary {
    fn of(session: &FilterSession) -> Self {
        Self {
            state: session.state().clone(),
            active_filters: session.active_filter_count(),
            active_dimensions: session.state().active_dimensions(),
            pending: session.is_evaluation_pending(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RecordDetail {
    #[serde(flatten)]
    pub record: ResumeRecord,
    /// Whether the record passes the current filter state.
    pub matches_filters: bool,
}

#[derive(Debug, Serialize)]
pub struct ReloadResponse {
    pub records: usize,
    pub source: String,
}

/// GET /api/v1/records?sort=<key>&order=asc|desc
pub async fn handle_get_records(
    State(state): State<AppState>,
    params: Result<Query<SortParams>, QueryRejection>,
) -> Result<Json<FilteredView>, AppError> {
    let Query(params) =
        params.map_err(|e| AppError::Validation(format!("Invalid sort: {}", e.body_text())))?;
    let mut view = state.session.lock().await.view();
    if let Some(key) = params.sort {
        sort_records(&mut view.records, key, params.order);
    }
    Ok(Json(view))
}

/// GET /api/v1/records/:analysis_id
pub async fn handle_get_record(
    State(state): State<AppState>,
    Path(analysis_id): Path<String>,
) -> Result<Json<RecordDetail>, AppError> {
    let session = state.session.lock().await;
    let record = session
        .find(&analysis_id)
        .ok_or_else(|| AppError::NotFound(format!("Resume analysis {analysis_id} not found")))?;
    Ok(Json(RecordDetail {
        matches_filters: matches(record, session.state()),
        record: record.clone(),
    }))
}

/// GET /api/v1/options
pub async fn handle_get_options(State(state): State<AppState>) -> Json<FilterOptions> {
    Json(state.session.lock().await.options().clone())
}

/// GET /api/v1/filters
pub async fn handle_get_filters(State(state): State<AppState>) -> Json<FilterSummary> {
    Json(FilterSummary::of(&*state.session.lock().await))
}

/// PUT /api/v1/filters
pub async fn handle_update_filter(
    State(state): State<AppState>,
    payload: Result<Json<FilterUpdate>, JsonRejection>,
) -> Result<Json<FilterSummary>, AppError> {
    let Json(update) = payload
        .map_err(|e| AppError::Validation(format!("Invalid filter update: {}", e.body_text())))?;
    let mut session = state.session.lock().await;
    session.apply(update);
    Ok(Json(FilterSummary::of(&session)))
}

/// DELETE /api/v1/filters/:dimension
pub async fn handle_clear_filter(
    State(state): State<AppState>,
    Path(dimension): Path<String>,
) -> Result<Json<FilterSummary>, AppError> {
    let dimension: FilterDimension = dimension.parse()?;
    let mut session = state.session.lock().await;
    session.clear(dimension);
    Ok(Json(FilterSummary::of(&session)))
}

/// DELETE /api/v1/filters/:dimension/values/:value
pub async fn handle_remove_filter_value(
    State(state): State<AppState>,
    Path((dimension, value)): Path<(String, String)>,
) -> Result<Json<FilterSummary>, AppError> {
    let dimension: FilterDimension = dimension.parse()?;
    let mut session = state.session.lock().await;
    session.remove_value(dimension, &value)?;
    Ok(Json(FilterSummary::of(&session)))
}

/// POST /api/v1/filters/reset
pub async fn handle_reset_filters(State(state): State<AppState>) -> Json<FilterSummary> {
    let mut session = state.session.lock().await;
    session.reset();
    Json(FilterSummary::of(&session))
}

/// POST /api/v1/dataset/reload
pub async fn handle_reload_dataset(
    State(state): State<AppState>,
) -> Result<Json<ReloadResponse>, AppError> {
    let source = state.source.describe();
    // Fetch outside the session lock.
    let records = state.source.fetch_all().await.map_err(|e| {
        warn!(source = %source, "Dataset reload failed: {e}");
        e
    })?;
    let count = records.len();
    state.session.lock().await.replace_dataset(records);
    info!(source = %source, records = count, "Dataset reloaded");
    Ok(Json(ReloadResponse {
        records: count,
        source,
    }))
}

/// GET /api/v1/stats
pub async fn handle_get_stats(State(state): State<AppState>) -> Json<DatasetStats> {
    let session = state.session.lock().await;
    Json(compute_stats(session.dataset(), Utc::now().date_naive()))
}
