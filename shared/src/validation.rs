//! Entry-time validation for the bloom, abortion and harvest workflows
//!
//! Rejects bad input before it is persisted. Nothing here clamps: only the
//! read-side ledger tolerates already-bad data.

use thiserror::Error;

use crate::models::FarmSettings;

/// Upper bound accepted for a bloom's maturity period
pub const MAX_MATURITY_PERIOD_DAYS: u32 = 365;
/// Upper bound accepted for a single count field
pub const MAX_ENTRY_COUNT: u32 = 10_000;

/// Reasons an entry is rejected before persistence
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EntryValidationError {
    #[error("{field} must be greater than 0")]
    NonPositive { field: &'static str },

    #[error("{field} must be at most {max}")]
    TooLarge { field: &'static str, max: u32 },

    #[error("{field} must be a whole number, got '{value}'")]
    NotANumber { field: &'static str, value: String },

    #[error("{field} of {requested} exceeds the {remaining} fruit remaining on this bloom")]
    ExceedsRemaining {
        field: &'static str,
        requested: u32,
        remaining: u32,
    },

    #[error("flower_count of {requested} is below the {accounted} already aborted or harvested")]
    BelowAccounted { requested: u32, accounted: u32 },

    #[error("location_id must not be empty")]
    EmptyLocation,
}

impl EntryValidationError {
    /// Name of the offending input field
    pub fn field(&self) -> &'static str {
        match self {
            EntryValidationError::NonPositive { field }
            | EntryValidationError::TooLarge { field, .. }
            | EntryValidationError::NotANumber { field, .. }
            | EntryValidationError::ExceedsRemaining { field, .. } => field,
            EntryValidationError::BelowAccounted { .. } => "flower_count",
            EntryValidationError::EmptyLocation => "location_id",
        }
    }
}

/// Validate a count supplied by the caller and narrow it
pub fn validate_count(field: &'static str, value: i64) -> Result<u32, EntryValidationError> {
    if value <= 0 {
        return Err(EntryValidationError::NonPositive { field });
    }
    if value > i64::from(MAX_ENTRY_COUNT) {
        return Err(EntryValidationError::TooLarge {
            field,
            max: MAX_ENTRY_COUNT,
        });
    }
    Ok(value as u32)
}

/// Parse and validate a count typed into a form field
pub fn parse_count(field: &'static str, raw: &str) -> Result<u32, EntryValidationError> {
    let value: i64 = raw
        .trim()
        .parse()
        .map_err(|_| EntryValidationError::NotANumber {
            field,
            value: raw.to_string(),
        })?;
    validate_count(field, value)
}

pub fn validate_maturity_period(days: i64) -> Result<u32, EntryValidationError> {
    let field = "maturity_period_days";
    if days <= 0 {
        return Err(EntryValidationError::NonPositive { field });
    }
    if days > i64::from(MAX_MATURITY_PERIOD_DAYS) {
        return Err(EntryValidationError::TooLarge {
            field,
            max: MAX_MATURITY_PERIOD_DAYS,
        });
    }
    Ok(days as u32)
}

/// Location ids are free text keys; only emptiness is rejected
pub fn validate_location_id(location_id: &str) -> Result<(), EntryValidationError> {
    if location_id.trim().is_empty() {
        return Err(EntryValidationError::EmptyLocation);
    }
    Ok(())
}

/// An abortion or harvest may not take more fruit than the bloom still has
pub fn validate_against_remaining(
    field: &'static str,
    requested: u32,
    remaining: u32,
) -> Result<(), EntryValidationError> {
    if requested > remaining {
        return Err(EntryValidationError::ExceedsRemaining {
            field,
            requested,
            remaining,
        });
    }
    Ok(())
}

/// A corrected flower count may not drop below fruit already accounted for
pub fn validate_corrected_flower_count(
    requested: u32,
    total_aborted: u32,
    total_harvested: u32,
) -> Result<(), EntryValidationError> {
    let accounted = total_aborted.saturating_add(total_harvested);
    if requested < accounted {
        return Err(EntryValidationError::BelowAccounted {
            requested,
            accounted,
        });
    }
    Ok(())
}

pub fn validate_settings(settings: &FarmSettings) -> Result<(), EntryValidationError> {
    validate_maturity_period(i64::from(settings.maturity_period_days))?;
    Ok(())
}
