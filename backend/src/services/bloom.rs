//! Bloom logging service

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use shared::{
    find_location, validate_corrected_flower_count, validate_count, validate_location_id,
    validate_maturity_period, AbortionEntry, BloomEntry, FarmLocation, FarmSettings, FruitVariety,
    HarvestEntry, MediaReference,
};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::store::Collection;

use super::entries::{EntryFilter, EntryRepository};
use super::settings::SettingsService;

/// Bloom service for logging and correcting blooms
#[derive(Clone)]
pub struct BloomService {
    entries: EntryRepository,
    settings: SettingsService,
}

/// Input for logging a bloom
#[derive(Debug, Deserialize)]
pub struct LogBloomInput {
    /// Defaults to today
    pub bloom_date: Option<NaiveDate>,
    pub location_id: String,
    /// Defaults to the configured variety
    pub variety: Option<FruitVariety>,
    pub flower_count: i64,
    /// Defaults to the configured maturity period
    pub maturity_period_days: Option<i64>,
    pub photo: Option<MediaReference>,
    pub note: Option<String>,
}

/// Input for correcting a mistakenly logged bloom
#[derive(Debug, Default, Deserialize)]
pub struct CorrectBloomInput {
    pub bloom_date: Option<NaiveDate>,
    pub location_id: Option<String>,
    pub variety: Option<FruitVariety>,
    pub flower_count: Option<i64>,
    pub maturity_period_days: Option<i64>,
    pub note: Option<String>,
}

/// A bloom with its balance and event history
#[derive(Debug, Clone, Serialize)]
pub struct BloomDetail {
    pub bloom: BloomEntry,
    /// `None` when the location id is not in the current catalog
    pub location: Option<FarmLocation>,
    pub expected_harvest_date: NaiveDate,
    pub total_aborted: u32,
    pub total_harvested: u32,
    pub remaining: u32,
    pub abortions: Vec<AbortionEntry>,
    pub harvests: Vec<HarvestEntry>,
}

impl BloomService {
    pub fn new(entries: EntryRepository, default_settings: FarmSettings) -> Self {
        Self {
            settings: SettingsService::new(entries.clone(), default_settings),
            entries,
        }
    }

    /// List blooms, newest bloom date first
    pub async fn list_blooms(&self, filter: &EntryFilter) -> Vec<BloomEntry> {
        let mut blooms: Vec<BloomEntry> = self
            .entries
            .load_blooms()
            .await
            .into_iter()
            .filter(|b| filter.matches_bloom(b))
            .collect();
        blooms.sort_by(|a, b| b.bloom_date.cmp(&a.bloom_date).then(b.created_at.cmp(&a.created_at)));
        blooms
    }

    pub async fn get_bloom_detail(&self, bloom_id: Uuid) -> AppResult<BloomDetail> {
        let snapshot = self.entries.load_snapshot_strict().await?;
        let ledger = snapshot.ledger();
        let line = ledger
            .line(bloom_id)
            .ok_or_else(|| AppError::NotFound("Bloom".to_string()))?;

        Ok(BloomDetail {
            bloom: line.bloom.clone(),
            location: find_location(&line.bloom.location_id),
            expected_harvest_date: line.bloom.expected_harvest_date(),
            total_aborted: line.total_aborted,
            total_harvested: line.total_harvested,
            remaining: line.remaining,
            abortions: ledger.abortions_for(bloom_id).iter().map(|&a| a.clone()).collect(),
            harvests: ledger.harvests_for(bloom_id).iter().map(|&h| h.clone()).collect(),
        })
    }

    /// Validate and persist a new bloom.
    ///
    /// The maturity period in force now is stored on the entry, so later
    /// settings changes do not move this bloom's forecast.
    pub async fn log_bloom(&self, input: LogBloomInput, today: NaiveDate) -> AppResult<BloomEntry> {
        validate_location_id(&input.location_id)?;
        let flower_count = validate_count("flower_count", input.flower_count)?;

        let settings = self.settings.get_settings().await;
        let maturity_period_days = match input.maturity_period_days {
            Some(days) => validate_maturity_period(days)?,
            None => settings.maturity_period_days,
        };

        let bloom = BloomEntry {
            id: Uuid::new_v4(),
            bloom_date: input.bloom_date.unwrap_or(today),
            location_id: input.location_id.trim().to_string(),
            variety: input.variety.unwrap_or(settings.default_variety),
            flower_count,
            maturity_period_days,
            photo: input.photo,
            note: input.note,
            created_at: Utc::now(),
        };

        if find_location(&bloom.location_id).is_none() {
            tracing::debug!(location_id = %bloom.location_id, "Bloom logged at a location outside the catalog");
        }

        self.entries.append(Collection::Blooms, bloom.id, &bloom).await?;
        Ok(bloom)
    }

    /// Rewrite a bloom to fix a data-entry mistake
    pub async fn correct_bloom(&self, bloom_id: Uuid, input: CorrectBloomInput) -> AppResult<BloomEntry> {
        let snapshot = self.entries.load_snapshot_strict().await?;
        let ledger = snapshot.ledger();
        let line = ledger
            .line(bloom_id)
            .ok_or_else(|| AppError::NotFound("Bloom".to_string()))?;

        let mut bloom = line.bloom.clone();
        if let Some(date) = input.bloom_date {
            bloom.bloom_date = date;
        }
        if let Some(location_id) = input.location_id {
            validate_location_id(&location_id)?;
            bloom.location_id = location_id.trim().to_string();
        }
        if let Some(variety) = input.variety {
            bloom.variety = variety;
        }
        if let Some(count) = input.flower_count {
            let count = validate_count("flower_count", count)?;
            validate_corrected_flower_count(count, line.total_aborted, line.total_harvested)?;
            bloom.flower_count = count;
        }
        if let Some(days) = input.maturity_period_days {
            bloom.maturity_period_days = validate_maturity_period(days)?;
        }
        if input.note.is_some() {
            bloom.note = input.note;
        }

        self.entries.rewrite(Collection::Blooms, bloom.id, &bloom).await?;
        Ok(bloom)
    }
}
