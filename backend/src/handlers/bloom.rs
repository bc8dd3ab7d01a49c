//! Bloom logging HTTP handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use shared::BloomEntry;
use uuid::Uuid;

use crate::error::AppResult;
use crate::services::bloom::{BloomDetail, BloomService, CorrectBloomInput, LogBloomInput};
use crate::AppState;

use super::{resolve_today, ListQuery, TodayQuery};

fn service(state: &AppState) -> BloomService {
    BloomService::new(state.entries(), state.config.farm.default_settings())
}

/// List blooms matching the query
pub async fn list_blooms(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<BloomEntry>>> {
    let filter = query.into_filter()?;
    Ok(Json(service(&state).list_blooms(&filter).await))
}

/// Bloom with its balance and abortion/harvest history
pub async fn get_bloom(
    State(state): State<AppState>,
    Path(bloom_id): Path<Uuid>,
) -> AppResult<Json<BloomDetail>> {
    Ok(Json(service(&state).get_bloom_detail(bloom_id).await?))
}

/// Log a new bloom; `today` fills in a missing bloom date
pub async fn log_bloom(
    State(state): State<AppState>,
    Query(query): Query<TodayQuery>,
    Json(input): Json<LogBloomInput>,
) -> AppResult<(StatusCode, Json<BloomEntry>)> {
    let today = resolve_today(query.today.as_deref())?;
    let bloom = service(&state).log_bloom(input, today).await?;
    tracing::info!(bloom_id = %bloom.id, location_id = %bloom.location_id, "Bloom logged");
    Ok((StatusCode::CREATED, Json(bloom)))
}

/// Correct a bloom entry
pub async fn correct_bloom(
    State(state): State<AppState>,
    Path(bloom_id): Path<Uuid>,
    Json(input): Json<CorrectBloomInput>,
) -> AppResult<Json<BloomEntry>> {
    Ok(Json(service(&state).correct_bloom(bloom_id, input).await?))
}
