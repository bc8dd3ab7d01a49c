//! Harvest recording HTTP handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use shared::HarvestEntry;
use uuid::Uuid;

use crate::error::AppResult;
use crate::services::harvest::{HarvestService, RecordHarvestInput};
use crate::AppState;

use super::{resolve_today, ListQuery, TodayQuery};

/// List harvests matching the query
pub async fn list_harvests(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<HarvestEntry>>> {
    let filter = query.into_filter()?;
    let service = HarvestService::new(state.entries());
    Ok(Json(service.list_harvests(&filter).await))
}

/// Record a new harvest
pub async fn record_harvest(
    State(state): State<AppState>,
    Query(query): Query<TodayQuery>,
    Json(input): Json<RecordHarvestInput>,
) -> AppResult<(StatusCode, Json<HarvestEntry>)> {
    let today = resolve_today(query.today.as_deref())?;
    let service = HarvestService::new(state.entries());
    let harvest = service.record_harvest(input, today).await?;
    Ok((StatusCode::CREATED, Json(harvest)))
}

/// Delete a harvest recorded by mistake
pub async fn delete_harvest(
    State(state): State<AppState>,
    Path(harvest_id): Path<Uuid>,
) -> AppResult<StatusCode> {
    HarvestService::new(state.entries())
        .delete_harvest(harvest_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
