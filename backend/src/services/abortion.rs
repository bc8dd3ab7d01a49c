//! Flower abortion recording service

use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use shared::{validate_against_remaining, validate_count, AbortionEntry, MediaReference};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::store::Collection;

use super::entries::{EntryFilter, EntryRepository};

#[derive(Clone)]
pub struct AbortionService {
    entries: EntryRepository,
}

/// Input for recording aborted flowers against a bloom
#[derive(Debug, Deserialize)]
pub struct RecordAbortionInput {
    /// Defaults to today
    pub abortion_date: Option<NaiveDate>,
    pub bloom_entry_id: Uuid,
    pub aborted_count: i64,
    pub note: Option<String>,
    pub photo: Option<MediaReference>,
}

impl AbortionService {
    pub fn new(entries: EntryRepository) -> Self {
        Self { entries }
    }

    /// List abortions, newest first
    pub async fn list_abortions(&self, filter: &EntryFilter) -> Vec<AbortionEntry> {
        let mut abortions: Vec<AbortionEntry> = self
            .entries
            .load_abortions()
            .await
            .into_iter()
            .filter(|a| filter.matches_abortion(a))
            .collect();
        abortions.sort_by(|a, b| {
            b.abortion_date
                .cmp(&a.abortion_date)
                .then(b.created_at.cmp(&a.created_at))
        });
        abortions
    }

    /// Record an abortion. The bloom must exist and the count may not
    /// exceed what is still on the plant.
    pub async fn record_abortion(
        &self,
        input: RecordAbortionInput,
        today: NaiveDate,
    ) -> AppResult<AbortionEntry> {
        let aborted_count = validate_count("aborted_count", input.aborted_count)?;

        let snapshot = self.entries.load_snapshot_strict().await?;
        let ledger = snapshot.ledger();
        let line = ledger
            .line(input.bloom_entry_id)
            .ok_or_else(|| AppError::NotFound("Bloom".to_string()))?;
        validate_against_remaining("aborted_count", aborted_count, line.remaining)?;

        let abortion = AbortionEntry {
            id: Uuid::new_v4(),
            abortion_date: input.abortion_date.unwrap_or(today),
            bloom_entry_id: input.bloom_entry_id,
            aborted_count,
            note: input.note,
            photo: input.photo,
            created_at: Utc::now(),
        };

        self.entries
            .append(Collection::Abortions, abortion.id, &abortion)
            .await?;

        tracing::info!(
            bloom_entry_id = %abortion.bloom_entry_id,
            aborted_count,
            remaining = line.remaining - aborted_count,
            "Abortion recorded"
        );
        Ok(abortion)
    }

    pub async fn delete_abortion(&self, abortion_id: Uuid) -> AppResult<()> {
        self.entries.remove(Collection::Abortions, abortion_id).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::bloom::{BloomService, LogBloomInput};
    use crate::store::MemoryEventStore;
    use shared::FarmSettings;
    use std::sync::Arc;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    async fn setup(flower_count: i64) -> (AbortionService, Uuid) {
        let (service, bloom_id, _) = setup_with_store(flower_count).await;
        (service, bloom_id)
    }

    async fn setup_with_store(flower_count: i64) -> (AbortionService, Uuid, Arc<MemoryEventStore>) {
        let store = Arc::new(MemoryEventStore::new());
        let entries = EntryRepository::new(store.clone());
        let bloom = BloomService::new(entries.clone(), FarmSettings::default())
            .log_bloom(
                LogBloomInput {
                    bloom_date: Some(date(2024, 1, 1)),
                    location_id: "S21C".to_string(),
                    variety: None,
                    flower_count,
                    maturity_period_days: None,
                    photo: None,
                    note: None,
                },
                date(2024, 1, 1),
            )
            .await
            .unwrap();
        (AbortionService::new(entries), bloom.id, store)
    }

    fn input(bloom_entry_id: Uuid, aborted_count: i64) -> RecordAbortionInput {
        RecordAbortionInput {
            abortion_date: None,
            bloom_entry_id,
            aborted_count,
            note: None,
            photo: None,
        }
    }

    #[tokio::test]
    async fn test_record_abortion() {
        let (service, bloom_id) = setup(10).await;
        let abortion = service.record_abortion(input(bloom_id, 3), date(2024, 1, 4)).await.unwrap();
        assert_eq!(abortion.abortion_date, date(2024, 1, 4));
        assert_eq!(abortion.aborted_count, 3);
        assert_eq!(service.list_abortions(&EntryFilter::default()).await, vec![abortion]);
    }

    #[tokio::test]
    async fn test_abortion_cannot_exceed_remaining() {
        let (service, bloom_id) = setup(5).await;
        service.record_abortion(input(bloom_id, 4), date(2024, 1, 4)).await.unwrap();

        let err = service.record_abortion(input(bloom_id, 2), date(2024, 1, 5)).await.unwrap_err();
        assert!(matches!(err, AppError::Validation { ref field, .. } if field == "aborted_count"));

        service.record_abortion(input(bloom_id, 1), date(2024, 1, 5)).await.unwrap();
    }

    #[tokio::test]
    async fn test_abortion_refused_while_abortions_unreadable() {
        let (service, bloom_id, store) = setup_with_store(10).await;
        service.record_abortion(input(bloom_id, 7), date(2024, 1, 4)).await.unwrap();

        store.set_unreadable(Collection::Abortions, true);
        let err = service.record_abortion(input(bloom_id, 7), date(2024, 1, 5)).await.unwrap_err();
        assert!(matches!(err, AppError::StorageError(_)));

        store.set_unreadable(Collection::Abortions, false);
        assert_eq!(service.list_abortions(&EntryFilter::default()).await.len(), 1);
        let err = service.record_abortion(input(bloom_id, 7), date(2024, 1, 5)).await.unwrap_err();
        assert!(matches!(err, AppError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_abortion_requires_known_bloom() {
        let (service, _) = setup(5).await;
        let err = service.record_abortion(input(Uuid::new_v4(), 1), date(2024, 1, 4)).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_abortion_rejects_non_positive() {
        let (service, bloom_id) = setup(5).await;
        assert!(service.record_abortion(input(bloom_id, 0), date(2024, 1, 4)).await.is_err());
        assert!(service.record_abortion(input(bloom_id, -2), date(2024, 1, 4)).await.is_err());
    }

    #[tokio::test]
    async fn test_delete_abortion() {
        let (service, bloom_id) = setup(5).await;
        let abortion = service.record_abortion(input(bloom_id, 5), date(2024, 1, 4)).await.unwrap();
        service.delete_abortion(abortion.id).await.unwrap();
        assert!(service.list_abortions(&EntryFilter::default()).await.is_empty());

        // Freed flowers can be recorded again
        service.record_abortion(input(bloom_id, 5), date(2024, 1, 6)).await.unwrap();

        assert!(matches!(
            service.delete_abortion(abortion.id).await,
            Err(AppError::NotFound(_))
        ));
    }
}
