//! Harvest recording service

use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use shared::{validate_against_remaining, validate_count, HarvestEntry, MediaReference};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::store::Collection;

use super::entries::{EntryFilter, EntryRepository};

/// Harvest service for recording picked fruit
#[derive(Clone)]
pub struct HarvestService {
    entries: EntryRepository,
}

/// Input for recording a harvest
#[derive(Debug, Deserialize)]
pub struct RecordHarvestInput {
    /// Defaults to today
    pub harvest_date: Option<NaiveDate>,
    pub bloom_entry_id: Uuid,
    pub harvested_count: i64,
    pub note: Option<String>,
    pub photo: Option<MediaReference>,
}

impl HarvestService {
    pub fn new(entries: EntryRepository) -> Self {
        Self { entries }
    }

    /// List harvests, newest first
    pub async fn list_harvests(&self, filter: &EntryFilter) -> Vec<HarvestEntry> {
        let mut harvests: Vec<HarvestEntry> = self
            .entries
            .load_harvests()
            .await
            .into_iter()
            .filter(|h| filter.matches_harvest(h))
            .collect();
        harvests.sort_by(|a, b| {
            b.harvest_date
                .cmp(&a.harvest_date)
                .then(b.created_at.cmp(&a.created_at))
        });
        harvests
    }

    /// Record a harvest against a bloom.
    ///
    /// Harvesting before the expected date is allowed; only the count is
    /// checked against the fruit still on the plant.
    pub async fn record_harvest(
        &self,
        input: RecordHarvestInput,
        today: NaiveDate,
    ) -> AppResult<HarvestEntry> {
        let harvested_count = validate_count("harvested_count", input.harvested_count)?;

        let snapshot = self.entries.load_snapshot_strict().await?;
        let ledger = snapshot.ledger();
        let line = ledger
            .line(input.bloom_entry_id)
            .ok_or_else(|| AppError::NotFound("Bloom".to_string()))?;
        validate_against_remaining("harvested_count", harvested_count, line.remaining)?;

        let harvest = HarvestEntry {
            id: Uuid::new_v4(),
            harvest_date: input.harvest_date.unwrap_or(today),
            bloom_entry_id: input.bloom_entry_id,
            harvested_count,
            note: input.note,
            photo: input.photo,
            created_at: Utc::now(),
        };

        self.entries
            .append(Collection::Harvests, harvest.id, &harvest)
            .await?;

        tracing::info!(
            bloom_entry_id = %harvest.bloom_entry_id,
            harvested_count,
            remaining = line.remaining - harvested_count,
            "Harvest recorded"
        );
        Ok(harvest)
    }

    pub async fn delete_harvest(&self, harvest_id: Uuid) -> AppResult<()> {
        self.entries.remove(Collection::Harvests, harvest_id).await?;
        Ok(())
    }
}
