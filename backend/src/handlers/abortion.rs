//! Abortion recording HTTP handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use shared::AbortionEntry;
use uuid::Uuid;

use crate::error::AppResult;
use crate::services::abortion::{AbortionService, RecordAbortionInput};
use crate::AppState;

use super::{resolve_today, ListQuery, TodayQuery};

pub async fn list_abortions(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<AbortionEntry>>> {
    let filter = query.into_filter()?;
    let service = AbortionService::new(state.entries());
    Ok(Json(service.list_abortions(&filter).await))
}

/// Record aborted flowers against a bloom
pub async fn record_abortion(
    State(state): State<AppState>,
    Query(query): Query<TodayQuery>,
    Json(input): Json<RecordAbortionInput>,
) -> AppResult<(StatusCode, Json<AbortionEntry>)> {
    let today = resolve_today(query.today.as_deref())?;
    let service = AbortionService::new(state.entries());
    let abortion = service.record_abortion(input, today).await?;
    Ok((StatusCode::CREATED, Json(abortion)))
}

pub async fn delete_abortion(
    State(state): State<AppState>,
    Path(abortion_id): Path<Uuid>,
) -> AppResult<StatusCode> {
    AbortionService::new(state.entries())
        .delete_abortion(abortion_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
