//! HTTP handlers for the REST API.
//!
//! Each handler pulls the uploaded file out of the multipart body and
//! delegates to the service layer; skip accounting flows into the
//! shared stats tracker.

use axum::extract::{Multipart, State};
use axum::Json;

use super::dto::{
    AnalyzeImageResponse, BusySlotsResponse, GridResponse, HealthResponse, StatsResponse,
};
use super::error::AppError;
use super::state::AppState;
use crate::services::export;

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

/// GET /health
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: "v1".to_string(),
    })
}

/// Read the first file field out of a multipart upload.
async fn read_upload(mut multipart: Multipart) -> Result<(Option<String>, Vec<u8>), AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("unreadable multipart body: {}", e)))?
    {
        let file_name = field.file_name().map(str::to_string);
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(format!("unreadable upload: {}", e)))?;
        if !bytes.is_empty() {
            return Ok((file_name, bytes.to_vec()));
        }
    }
    Err(AppError::BadRequest("no file in upload".to_string()))
}

/// POST /process
///
/// Accepts a multipart CSV or JSON file and returns the occupied
/// half-hour slots, one id per 30-minute interval, deduplicated.
pub async fn process_schedule(
    State(state): State<AppState>,
    multipart: Multipart,
) -> HandlerResult<BusySlotsResponse> {
    let (file_name, bytes) = read_upload(multipart).await?;
    let outcome = state
        .processor
        .process_bytes(&bytes, file_name.as_deref())?;
    state.stats.record_run(outcome.entries.len(), &outcome.skips);

    Ok(Json(BusySlotsResponse {
        busy_slots: outcome.busy_slots,
    }))
}

/// POST /v1/grid
///
/// Accepts a multipart CSV or JSON file and returns the assembled
/// day×time matrix with per-run diagnostics.
pub async fn build_grid(
    State(state): State<AppState>,
    multipart: Multipart,
) -> HandlerResult<GridResponse> {
    let (file_name, bytes) = read_upload(multipart).await?;
    let outcome = state
        .processor
        .process_bytes(&bytes, file_name.as_deref())?;
    state.stats.record_run(outcome.entries.len(), &outcome.skips);

    let grid = &outcome.grid;
    Ok(Json(GridResponse {
        rows: grid.rows(),
        columns: grid.columns(),
        row_labels: (0..grid.rows()).map(|r| grid.row_label(r).to_string()).collect(),
        cells: grid.to_text_rows(),
        entries: outcome.entries,
        skips: outcome.skips,
    }))
}

/// POST /v1/export
///
/// Accepts a multipart CSV or JSON file and returns the normalized
/// record set as `text/csv`.
pub async fn export_csv(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<([(&'static str, &'static str); 1], String), AppError> {
    let (file_name, bytes) = read_upload(multipart).await?;
    let outcome = state
        .processor
        .process_bytes(&bytes, file_name.as_deref())?;
    state.stats.record_run(outcome.entries.len(), &outcome.skips);

    let body = export::entries_to_csv(&outcome.entries)?;
    Ok(([("content-type", "text/csv")], body))
}

/// POST /v1/analyze-image
///
/// Accepts a multipart PNG/JPEG schedule image and returns the labeled
/// blocks plus the schedule entries derived from them. OCR runs on a
/// blocking thread; the request stays synchronous from the caller's
/// point of view.
pub async fn analyze_image(
    State(state): State<AppState>,
    multipart: Multipart,
) -> HandlerResult<AnalyzeImageResponse> {
    let (_, bytes) = read_upload(multipart).await?;

    let processor = state.image_processor.clone();
    let result = tokio::task::spawn_blocking(move || {
        let img = image::load_from_memory(&bytes)?.to_rgb8();
        let analysis = processor.analyze(&img);
        let (entries, entry_skips) = processor.entries_from(&img, &analysis);
        Ok::<_, crate::error::PipelineError>((analysis, entries, entry_skips))
    })
    .await
    .map_err(|e| AppError::Internal(format!("image task panic: {}", e)))?;

    let (analysis, entries, entry_skips) = result?;
    let mut skips = analysis.skips;
    skips.merge(&entry_skips);
    state.stats.record_run(entries.len(), &skips);

    Ok(Json(AnalyzeImageResponse {
        blocks: analysis.blocks,
        entries,
        skips,
    }))
}

/// GET /v1/stats
pub async fn get_stats(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(StatsResponse {
        totals: state.stats.snapshot(),
    })
}
