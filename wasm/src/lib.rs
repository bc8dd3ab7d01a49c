//! WebAssembly module for the Pitaya Bloom Tracker
//!
//! Runs the forecasting engine in the offline client, which keeps its own
//! copy of the entry collections:
//! - Harvest forecasts and dashboard summaries
//! - Abortion rate rankings
//! - Location catalog lookups
//! - Form validation for counts
//!
//! Entry collections are passed in and results returned as JSON strings.

use chrono::NaiveDate;
use serde::Serialize;
use shared::{
    abortion_rates_by_location, abortion_rates_by_variety, build_dashboard, find_location,
    forecast_harvests, generate_catalog, location_display_name, parse_count, AbortionEntry,
    BloomEntry, DashboardOptions, ForecastSections, HarvestEntry, ReadyTodayPolicy, YieldLedger,
};
use wasm_bindgen::prelude::*;

// Re-export shared types for use in JavaScript
pub use shared::models::*;
pub use shared::types::*;
pub use shared::validation::*;

/// Entry collections as held by the client
struct Collections {
    blooms: Vec<BloomEntry>,
    abortions: Vec<AbortionEntry>,
    harvests: Vec<HarvestEntry>,
}

impl Collections {
    fn parse(blooms_json: &str, abortions_json: &str, harvests_json: &str) -> Result<Self, String> {
        Ok(Self {
            blooms: parse_collection("blooms", blooms_json)?,
            abortions: parse_collection("abortions", abortions_json)?,
            harvests: parse_collection("harvests", harvests_json)?,
        })
    }

    fn ledger(&self) -> YieldLedger<'_> {
        YieldLedger::build(&self.blooms, &self.abortions, &self.harvests)
    }
}

/// An empty string is an empty collection
fn parse_collection<T: serde::de::DeserializeOwned>(name: &str, json: &str) -> Result<Vec<T>, String> {
    if json.trim().is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str(json).map_err(|e| format!("Invalid {} JSON: {}", name, e))
}

fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| format!("Invalid date '{}', expected YYYY-MM-DD", raw))
}

fn to_json<T: Serialize>(value: &T) -> Result<String, String> {
    serde_json::to_string(value).map_err(|e| format!("Serialization error: {}", e))
}

fn to_js(err: String) -> JsValue {
    JsValue::from_str(&err)
}

/// Today's date from the device clock, used when the caller passes none
fn device_today() -> Result<NaiveDate, String> {
    let now = js_sys::Date::new_0();
    NaiveDate::from_ymd_opt(
        now.get_full_year() as i32,
        now.get_month() + 1,
        now.get_date(),
    )
    .ok_or_else(|| "Device clock returned an invalid date".to_string())
}

fn resolve_today(today: Option<String>) -> Result<NaiveDate, String> {
    match today {
        Some(raw) => parse_date(&raw),
        None => device_today(),
    }
}

fn warn_orphans(ledger: &YieldLedger<'_>) {
    let orphans = ledger.orphan_abortions() + ledger.orphan_harvests();
    if orphans > 0 {
        web_sys::console::warn_1(&JsValue::from_str(&format!(
            "{} entries reference blooms that no longer exist",
            orphans
        )));
    }
}

fn forecast_inner(collections: &Collections, today: NaiveDate, sections: bool) -> Result<String, String> {
    let forecasts = forecast_harvests(&collections.ledger(), today);
    if sections {
        to_json(&ForecastSections::from_sorted(forecasts))
    } else {
        to_json(&forecasts)
    }
}

fn dashboard_inner(
    collections: &Collections,
    today: NaiveDate,
    outstanding_only: bool,
) -> Result<String, String> {
    let options = DashboardOptions {
        ready_today_policy: if outstanding_only {
            ReadyTodayPolicy::OutstandingOnly
        } else {
            ReadyTodayPolicy::AllBlooms
        },
        ..DashboardOptions::default()
    };
    to_json(&build_dashboard(&collections.ledger(), today, &options))
}

fn abortion_rates_inner(collections: &Collections, group_by: &str, top_n: usize) -> Result<String, String> {
    let ledger = collections.ledger();
    match group_by {
        "location" => to_json(&abortion_rates_by_location(&ledger, top_n)),
        "variety" => to_json(&abortion_rates_by_variety(&ledger, top_n)),
        other => Err(format!("Unknown grouping '{}', expected location or variety", other)),
    }
}

fn expected_harvest_inner(bloom_date: &str, maturity_period_days: u32) -> Result<String, String> {
    let date = parse_date(bloom_date)?;
    validate_maturity_period(i64::from(maturity_period_days)).map_err(|e| e.to_string())?;
    date.checked_add_days(chrono::Days::new(u64::from(maturity_period_days)))
        .map(|d| d.format("%Y-%m-%d").to_string())
        .ok_or_else(|| "Expected harvest date is out of range".to_string())
}

/// Harvest forecast for outstanding blooms.
///
/// `today` is `YYYY-MM-DD`; when omitted the device date is used. With
/// `sections` the result is split into ready today, overdue and upcoming.
#[wasm_bindgen]
pub fn forecast_harvests_json(
    blooms_json: &str,
    abortions_json: &str,
    harvests_json: &str,
    today: Option<String>,
    sections: bool,
) -> Result<String, JsValue> {
    let collections = Collections::parse(blooms_json, abortions_json, harvests_json).map_err(to_js)?;
    let today = resolve_today(today).map_err(to_js)?;
    warn_orphans(&collections.ledger());
    forecast_inner(&collections, today, sections).map_err(to_js)
}

/// Dashboard summary for one day
#[wasm_bindgen]
pub fn dashboard_json(
    blooms_json: &str,
    abortions_json: &str,
    harvests_json: &str,
    today: Option<String>,
    outstanding_only: bool,
) -> Result<String, JsValue> {
    let collections = Collections::parse(blooms_json, abortions_json, harvests_json).map_err(to_js)?;
    let today = resolve_today(today).map_err(to_js)?;
    dashboard_inner(&collections, today, outstanding_only).map_err(to_js)
}

/// Abortion rates grouped by `location` or `variety`, highest first
#[wasm_bindgen]
pub fn abortion_rates_json(
    blooms_json: &str,
    abortions_json: &str,
    group_by: &str,
    top_n: usize,
) -> Result<String, JsValue> {
    let collections = Collections::parse(blooms_json, abortions_json, "").map_err(to_js)?;
    warn_orphans(&collections.ledger());
    abortion_rates_inner(&collections, group_by, top_n).map_err(to_js)
}

/// The full location catalog
#[wasm_bindgen]
pub fn location_catalog_json() -> Result<String, JsValue> {
    to_json(&generate_catalog()).map_err(to_js)
}

/// Location as JSON, or `undefined` for ids outside the catalog
#[wasm_bindgen]
pub fn find_location_json(location_id: &str) -> Option<String> {
    find_location(location_id).and_then(|l| serde_json::to_string(&l).ok())
}

#[wasm_bindgen]
pub fn location_name(location_id: &str) -> String {
    location_display_name(location_id)
}

/// Parse a count typed into a form field
#[wasm_bindgen]
pub fn parse_entry_count(field: &str, raw: &str) -> Result<u32, JsValue> {
    let field = match field {
        "flower_count" => "flower_count",
        "aborted_count" => "aborted_count",
        "harvested_count" => "harvested_count",
        _ => "count",
    };
    parse_count(field, raw).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Expected harvest date for a bloom, as `YYYY-MM-DD`
#[wasm_bindgen]
pub fn expected_harvest_date(bloom_date: &str, maturity_period_days: u32) -> Result<String, JsValue> {
    expected_harvest_inner(bloom_date, maturity_period_days).map_err(to_js)
}

/// Fruit still on the plant
#[wasm_bindgen]
pub fn remaining_count(flower_count: u32, total_aborted: u32, total_harvested: u32) -> u32 {
    shared::remaining_count(flower_count, total_aborted, total_harvested)
}
