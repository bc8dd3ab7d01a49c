//! Route definitions for the Pitaya Bloom Tracker

use axum::{
    routing::{delete, get},
    Router,
};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/locations", location_routes())
        .nest("/blooms", bloom_routes())
        .nest("/abortions", abortion_routes())
        .nest("/harvests", harvest_routes())
        .route("/forecast", get(handlers::get_forecast))
        .nest("/reports", reporting_routes())
        .route(
            "/settings",
            get(handlers::get_settings).put(handlers::update_settings),
        )
}

/// Location catalog routes
fn location_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_locations))
        .route("/:location_id", get(handlers::get_location))
}

/// Bloom routes
fn bloom_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_blooms).post(handlers::log_bloom))
        .route(
            "/:bloom_id",
            get(handlers::get_bloom).put(handlers::correct_bloom),
        )
}

/// Abortion routes
fn abortion_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_abortions).post(handlers::record_abortion))
        .route("/:abortion_id", delete(handlers::delete_abortion))
}

/// Harvest routes
fn harvest_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_harvests).post(handlers::record_harvest))
        .route("/:harvest_id", delete(handlers::delete_harvest))
}

/// Reporting routes
fn reporting_routes() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(handlers::get_dashboard))
        .route("/abortions", get(handlers::get_abortion_report))
        .route("/yield", get(handlers::get_yield_report))
}
