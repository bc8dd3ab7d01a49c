//! In-memory event store

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{Collection, EventStore, StoreError, StoreResult, StoredEntry};

/// Process-local store. Contents are lost on restart.
#[derive(Debug, Default)]
pub struct MemoryEventStore {
    collections: RwLock<HashMap<Collection, Vec<StoredEntry>>>,
    settings: RwLock<Option<serde_json::Value>>,
    unavailable: AtomicBool,
    unreadable: Mutex<HashSet<Collection>>,
}

impl MemoryEventStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent call fail with `StoreError::Unavailable`
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Make loads of one collection fail while every other call keeps working
    pub fn set_unreadable(&self, collection: Collection, unreadable: bool) {
        let mut guard = self.unreadable.lock().unwrap_or_else(|e| e.into_inner());
        if unreadable {
            guard.insert(collection);
        } else {
            guard.remove(&collection);
        }
    }

    fn ensure_readable(&self, collection: Collection) -> StoreResult<()> {
        self.ensure_available()?;
        let guard = self.unreadable.lock().unwrap_or_else(|e| e.into_inner());
        if guard.contains(&collection) {
            return Err(StoreError::Unavailable(format!("{} is unreadable", collection)));
        }
        Ok(())
    }

    fn ensure_available(&self) -> StoreResult<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("memory store switched off".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl EventStore for MemoryEventStore {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn health_check(&self) -> StoreResult<()> {
        self.ensure_available()
    }

    async fn load(&self, collection: Collection) -> StoreResult<Vec<StoredEntry>> {
        self.ensure_readable(collection)?;
        let guard = self.collections.read().await;
        Ok(guard.get(&collection).cloned().unwrap_or_default())
    }

    async fn append(&self, collection: Collection, entry: StoredEntry) -> StoreResult<()> {
        self.ensure_available()?;
        let mut guard = self.collections.write().await;
        // Ids are unique across all collections, as in the farm_entries table
        if guard.values().flatten().any(|e| e.id == entry.id) {
            return Err(StoreError::DuplicateEntry {
                collection,
                id: entry.id,
            });
        }
        guard.entry(collection).or_default().push(entry);
        Ok(())
    }

    async fn rewrite(&self, collection: Collection, entry: StoredEntry) -> StoreResult<()> {
        self.ensure_available()?;
        let mut guard = self.collections.write().await;
        let existing = guard
            .get_mut(&collection)
            .and_then(|entries| entries.iter_mut().find(|e| e.id == entry.id))
            .ok_or(StoreError::EntryNotFound {
                collection,
                id: entry.id,
            })?;
        *existing = entry;
        Ok(())
    }

    async fn remove(&self, collection: Collection, id: Uuid) -> StoreResult<()> {
        self.ensure_available()?;
        let mut guard = self.collections.write().await;
        let entries = guard.entry(collection).or_default();
        let before = entries.len();
        entries.retain(|e| e.id != id);
        if entries.len() == before {
            return Err(StoreError::EntryNotFound { collection, id });
        }
        Ok(())
    }

    async fn load_settings(&self) -> StoreResult<Option<serde_json::Value>> {
        self.ensure_available()?;
        Ok(self.settings.read().await.clone())
    }

    async fn save_settings(&self, settings: serde_json::Value) -> StoreResult<()> {
        self.ensure_available()?;
        *self.settings.write().await = Some(settings);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Arc;

    fn entry(n: i64) -> StoredEntry {
        StoredEntry {
            id: Uuid::new_v4(),
            payload: json!({ "n": n }),
        }
    }

    #[tokio::test]
    async fn test_append_preserves_order() {
        let store = MemoryEventStore::new();
        let a = entry(1);
        let b = entry(2);
        store.append(Collection::Blooms, a.clone()).await.unwrap();
        store.append(Collection::Blooms, b.clone()).await.unwrap();

        assert_eq!(store.load(Collection::Blooms).await.unwrap(), vec![a, b]);
        assert!(store.load(Collection::Harvests).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_append_rejected() {
        let store = MemoryEventStore::new();
        let a = entry(1);
        store.append(Collection::Abortions, a.clone()).await.unwrap();
        let err = store.append(Collection::Abortions, a).await.unwrap_err();
        assert!(matches!(err, StoreError::DuplicateEntry { .. }));
    }

    #[tokio::test]
    async fn test_id_taken_in_other_collection_rejected() {
        let store = MemoryEventStore::new();
        let a = entry(1);
        store.append(Collection::Blooms, a.clone()).await.unwrap();
        let err = store.append(Collection::Harvests, a).await.unwrap_err();
        assert!(matches!(
            err,
            StoreError::DuplicateEntry {
                collection: Collection::Harvests,
                ..
            }
        ));
        assert!(store.load(Collection::Harvests).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unreadable_collection_fails_loads_only() {
        let store = MemoryEventStore::new();
        store.append(Collection::Blooms, entry(1)).await.unwrap();
        store.set_unreadable(Collection::Harvests, true);

        assert!(matches!(
            store.load(Collection::Harvests).await,
            Err(StoreError::Unavailable(_))
        ));
        assert_eq!(store.load(Collection::Blooms).await.unwrap().len(), 1);
        store.append(Collection::Harvests, entry(2)).await.unwrap();

        store.set_unreadable(Collection::Harvests, false);
        assert_eq!(store.load(Collection::Harvests).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_rewrite_and_remove() {
        let store = MemoryEventStore::new();
        let a = entry(1);
        let b = entry(2);
        store.append(Collection::Blooms, a.clone()).await.unwrap();
        store.append(Collection::Blooms, b.clone()).await.unwrap();

        let corrected = StoredEntry {
            id: a.id,
            payload: json!({ "n": 10 }),
        };
        store.rewrite(Collection::Blooms, corrected.clone()).await.unwrap();
        assert_eq!(store.load(Collection::Blooms).await.unwrap()[0], corrected);

        store.remove(Collection::Blooms, b.id).await.unwrap();
        assert_eq!(store.load(Collection::Blooms).await.unwrap().len(), 1);
        assert!(matches!(
            store.remove(Collection::Blooms, b.id).await,
            Err(StoreError::EntryNotFound { .. })
        ));
        assert!(matches!(
            store.rewrite(Collection::Harvests, entry(3)).await,
            Err(StoreError::EntryNotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_concurrent_appends_are_all_kept() {
        let store = Arc::new(MemoryEventStore::new());
        let handles: Vec<_> = (0..20)
            .map(|n| {
                let store = store.clone();
                tokio::spawn(async move { store.append(Collection::Harvests, entry(n)).await })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap().unwrap();
        }
        assert_eq!(store.load(Collection::Harvests).await.unwrap().len(), 20);
    }

    #[tokio::test]
    async fn test_unavailable_store_fails() {
        let store = MemoryEventStore::new();
        store.set_unavailable(true);
        assert!(matches!(
            store.load(Collection::Blooms).await,
            Err(StoreError::Unavailable(_))
        ));
        assert!(store.health_check().await.is_err());
        store.set_unavailable(false);
        assert!(store.health_check().await.is_ok());
    }

    #[tokio::test]
    async fn test_settings_roundtrip() {
        let store = MemoryEventStore::new();
        assert_eq!(store.load_settings().await.unwrap(), None);
        store.save_settings(json!({ "maturity_period_days": 32 })).await.unwrap();
        assert_eq!(
            store.load_settings().await.unwrap(),
            Some(json!({ "maturity_period_days": 32 }))
        );
    }
}
