//! Farm location catalog handlers

use axum::{
    extract::{Path, Query},
    Json,
};
use serde::Deserialize;
use shared::{find_location, generate_catalog, FarmLocation, StructureType, Zone};

use crate::error::{AppError, AppResult};

#[derive(Debug, Deserialize)]
pub struct LocationQuery {
    pub structure_type: Option<StructureType>,
    pub zone: Option<Zone>,
}

/// List catalog locations, optionally narrowed by structure type and zone
pub async fn list_locations(Query(query): Query<LocationQuery>) -> Json<Vec<FarmLocation>> {
    let locations = generate_catalog()
        .into_iter()
        .filter(|l| query.structure_type.map_or(true, |t| l.structure_type == t))
        .filter(|l| query.zone.map_or(true, |z| l.zone == z))
        .collect();
    Json(locations)
}

pub async fn get_location(Path(location_id): Path<String>) -> AppResult<Json<FarmLocation>> {
    find_location(&location_id)
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Location".to_string()))
}
