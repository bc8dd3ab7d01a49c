//! HTTP request handlers

pub mod abortion;
pub mod bloom;
pub mod forecast;
pub mod harvest;
pub mod health;
pub mod location;
pub mod reporting;
pub mod settings;

pub use abortion::*;
pub use bloom::*;
pub use forecast::*;
pub use harvest::*;
pub use health::*;
pub use location::*;
pub use reporting::*;
pub use settings::*;

use chrono::NaiveDate;
use serde::Deserialize;
use shared::{DateRange, FruitVariety};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::services::EntryFilter;

/// Resolve the `today` query parameter, falling back to the server's local date
pub fn resolve_today(raw: Option<&str>) -> AppResult<NaiveDate> {
    match raw {
        Some(s) => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|_| AppError::Validation {
            field: "today".to_string(),
            message: format!("today must be a YYYY-MM-DD date, got '{}'", s),
        }),
        None => Ok(chrono::Local::now().date_naive()),
    }
}

/// Optional `?today=YYYY-MM-DD` override
#[derive(Debug, Default, Deserialize)]
pub struct TodayQuery {
    pub today: Option<String>,
}

/// Query parameters shared by the entry listings
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub location_id: Option<String>,
    pub variety: Option<FruitVariety>,
    pub bloom_entry_id: Option<Uuid>,
}

impl ListQuery {
    /// A single date bound leaves the other side open
    pub fn into_filter(self) -> AppResult<EntryFilter> {
        let date_range = match (self.start_date, self.end_date) {
            (None, None) => None,
            (start, end) => {
                let range = DateRange::new(start.unwrap_or(NaiveDate::MIN), end.unwrap_or(NaiveDate::MAX));
                if range.start > range.end {
                    return Err(AppError::ValidationError(
                        "start_date must not be after end_date".to_string(),
                    ));
                }
                Some(range)
            }
        };

        Ok(EntryFilter {
            date_range,
            location_id: self.location_id,
            variety: self.variety,
            bloom_entry_id: self.bloom_entry_id,
        })
    }
}
