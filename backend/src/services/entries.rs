//! Typed access to the event store
//!
//! Reads for display are fail-soft: a storage failure is logged and the
//! collection is treated as empty, so the dashboard and forecasts stay usable
//! in the field even when local storage is unreadable. Reads that back a
//! write use [`EntryRepository::load_snapshot_strict`] instead, since an empty
//! collection there would let a harvest or abortion overrun its bloom.
//! Entries that no longer decode (schema drift) are skipped individually in
//! both modes. Writes always propagate errors.

use std::sync::Arc;

use chrono::NaiveDate;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use shared::{AbortionEntry, BloomEntry, DateRange, FarmSettings, FruitVariety, HarvestEntry, YieldLedger};
use uuid::Uuid;

use crate::store::{Collection, EventStore, StoreResult, StoredEntry};

/// Typed, fail-soft wrapper around an [`EventStore`]
#[derive(Clone)]
pub struct EntryRepository {
    store: Arc<dyn EventStore>,
}

/// The three collections loaded together
#[derive(Debug, Clone, Default)]
pub struct EventSnapshot {
    pub blooms: Vec<BloomEntry>,
    pub abortions: Vec<AbortionEntry>,
    pub harvests: Vec<HarvestEntry>,
}

impl EventSnapshot {
    pub fn ledger(&self) -> YieldLedger<'_> {
        YieldLedger::build(&self.blooms, &self.abortions, &self.harvests)
    }
}

/// Optional filters for entry listings
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EntryFilter {
    pub date_range: Option<DateRange>,
    pub location_id: Option<String>,
    pub variety: Option<FruitVariety>,
    pub bloom_entry_id: Option<Uuid>,
}

impl EntryFilter {
    fn date_matches(&self, date: NaiveDate) -> bool {
        self.date_range.map_or(true, |range| range.contains(date))
    }

    pub fn matches_bloom(&self, bloom: &BloomEntry) -> bool {
        self.date_matches(bloom.bloom_date)
            && self.location_id.as_deref().map_or(true, |id| bloom.location_id == id)
            && self.variety.map_or(true, |v| bloom.variety == v)
            && self.bloom_entry_id.map_or(true, |id| bloom.id == id)
    }

    pub fn matches_abortion(&self, abortion: &AbortionEntry) -> bool {
        self.date_matches(abortion.abortion_date)
            && self.bloom_entry_id.map_or(true, |id| abortion.bloom_entry_id == id)
    }

    pub fn matches_harvest(&self, harvest: &HarvestEntry) -> bool {
        self.date_matches(harvest.harvest_date)
            && self.bloom_entry_id.map_or(true, |id| harvest.bloom_entry_id == id)
    }
}

impl EntryRepository {
    pub fn new(store: Arc<dyn EventStore>) -> Self {
        Self { store }
    }

    pub async fn load_blooms(&self) -> Vec<BloomEntry> {
        self.load_soft(Collection::Blooms).await
    }

    pub async fn load_abortions(&self) -> Vec<AbortionEntry> {
        self.load_soft(Collection::Abortions).await
    }

    pub async fn load_harvests(&self) -> Vec<HarvestEntry> {
        self.load_soft(Collection::Harvests).await
    }

    /// Load all three collections concurrently
    pub async fn load_snapshot(&self) -> EventSnapshot {
        let (blooms, abortions, harvests) =
            tokio::join!(self.load_blooms(), self.load_abortions(), self.load_harvests());
        EventSnapshot {
            blooms,
            abortions,
            harvests,
        }
    }

    /// Load all three collections, failing if any of them is unreadable
    pub async fn load_snapshot_strict(&self) -> StoreResult<EventSnapshot> {
        let (blooms, abortions, harvests) = tokio::try_join!(
            self.load_strict::<BloomEntry>(Collection::Blooms),
            self.load_strict::<AbortionEntry>(Collection::Abortions),
            self.load_strict::<HarvestEntry>(Collection::Harvests),
        )?;
        Ok(EventSnapshot {
            blooms,
            abortions,
            harvests,
        })
    }

    async fn load_soft<T: DeserializeOwned>(&self, collection: Collection) -> Vec<T> {
        match self.load_strict(collection).await {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!(%collection, error = %e, "Failed to load entries, treating as empty");
                Vec::new()
            }
        }
    }

    async fn load_strict<T: DeserializeOwned>(&self, collection: Collection) -> StoreResult<Vec<T>> {
        let rows = self.store.load(collection).await?;

        Ok(rows
            .into_iter()
            .filter_map(|row| match serde_json::from_value::<T>(row.payload) {
                Ok(entry) => Some(entry),
                Err(e) => {
                    tracing::warn!(%collection, id = %row.id, error = %e, "Skipping undecodable entry");
                    None
                }
            })
            .collect())
    }

    pub async fn append<T: Serialize>(&self, collection: Collection, id: Uuid, entry: &T) -> StoreResult<()> {
        let payload = serde_json::to_value(entry)?;
        self.store.append(collection, StoredEntry { id, payload }).await?;
        tracing::info!(%collection, %id, "Entry appended");
        Ok(())
    }

    pub async fn rewrite<T: Serialize>(&self, collection: Collection, id: Uuid, entry: &T) -> StoreResult<()> {
        let payload = serde_json::to_value(entry)?;
        self.store.rewrite(collection, StoredEntry { id, payload }).await?;
        tracing::info!(%collection, %id, "Entry rewritten");
        Ok(())
    }

    pub async fn remove(&self, collection: Collection, id: Uuid) -> StoreResult<()> {
        self.store.remove(collection, id).await?;
        tracing::info!(%collection, %id, "Entry removed");
        Ok(())
    }

    /// Stored settings, or `None` when never saved or unreadable
    pub async fn load_settings(&self) -> Option<FarmSettings> {
        match self.store.load_settings().await {
            Ok(Some(value)) => match serde_json::from_value(value) {
                Ok(settings) => Some(settings),
                Err(e) => {
                    tracing::warn!(error = %e, "Stored settings are undecodable, using defaults");
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load settings, using defaults");
                None
            }
        }
    }

    pub async fn save_settings(&self, settings: &FarmSettings) -> StoreResult<()> {
        self.store.save_settings(serde_json::to_value(settings)?).await
    }
}
