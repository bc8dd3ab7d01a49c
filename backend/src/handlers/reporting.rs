//! Reporting handlers for the dashboard and analytics

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use shared::DashboardSummary;

use crate::error::AppResult;
use crate::services::reporting::{AbortionReport, ReportingService, YieldReport};
use crate::AppState;

use super::{resolve_today, TodayQuery};

#[derive(Debug, Deserialize)]
pub struct AbortionReportQuery {
    pub limit: Option<usize>,
}

fn service(state: &AppState) -> ReportingService {
    let forecast = &state.config.forecast;
    ReportingService::new(state.entries(), forecast.dashboard_options(), forecast.analytics_top_n)
}

/// Get the dashboard for a day
pub async fn get_dashboard(
    State(state): State<AppState>,
    Query(query): Query<TodayQuery>,
) -> AppResult<Json<DashboardSummary>> {
    let today = resolve_today(query.today.as_deref())?;
    Ok(Json(service(&state).dashboard(today).await))
}

/// Abortion rates by location and variety
pub async fn get_abortion_report(
    State(state): State<AppState>,
    Query(query): Query<AbortionReportQuery>,
) -> Json<AbortionReport> {
    Json(service(&state).abortion_report(query.limit).await)
}

pub async fn get_yield_report(State(state): State<AppState>) -> Json<YieldReport> {
    Json(service(&state).yield_report().await)
}
