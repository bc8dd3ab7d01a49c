//! Harvest forecast handlers

use axum::{
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::services::{ForecastService, ReportingService};
use crate::AppState;

use super::resolve_today;

#[derive(Debug, Deserialize)]
pub struct ForecastQuery {
    pub today: Option<String>,
    pub format: Option<String>, // "json", "csv" or "sections"
}

/// Get the harvest forecast
pub async fn get_forecast(
    State(state): State<AppState>,
    Query(query): Query<ForecastQuery>,
) -> AppResult<Response> {
    let today = resolve_today(query.today.as_deref())?;
    let service = ForecastService::new(state.entries());

    match query.format.as_deref().unwrap_or("json") {
        "json" => Ok(Json(service.forecast(today).await).into_response()),
        "sections" => Ok(Json(service.sections(today).await).into_response()),
        "csv" => {
            let csv = ReportingService::export_to_csv(&service.forecast(today).await)?;
            Ok((
                [
                    (header::CONTENT_TYPE, "text/csv"),
                    (header::CONTENT_DISPOSITION, "attachment; filename=\"harvest_forecast.csv\""),
                ],
                csv,
            )
                .into_response())
        }
        other => Err(AppError::Validation {
            field: "format".to_string(),
            message: format!("Unsupported format '{}'", other),
        }),
    }
}
