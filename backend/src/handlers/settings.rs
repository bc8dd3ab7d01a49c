//! Farm settings handlers

use axum::{extract::State, Json};
use shared::FarmSettings;

use crate::error::AppResult;
use crate::services::settings::{SettingsService, UpdateSettingsInput};
use crate::AppState;

fn service(state: &AppState) -> SettingsService {
    SettingsService::new(state.entries(), state.config.farm.default_settings())
}

pub async fn get_settings(State(state): State<AppState>) -> Json<FarmSettings> {
    Json(service(&state).get_settings().await)
}

/// Update settings; only blooms logged afterwards pick up a new maturity period
pub async fn update_settings(
    State(state): State<AppState>,
    Json(input): Json<UpdateSettingsInput>,
) -> AppResult<Json<FarmSettings>> {
    Ok(Json(service(&state).update_settings(input).await?))
}
