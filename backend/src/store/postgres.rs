//! PostgreSQL event store
//!
//! Entries are stored one row each in `farm_entries` with a JSONB payload.
//! `seq` preserves insertion order; settings live in the single-row
//! `farm_settings` table.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::{Collection, EventStore, StoreError, StoreResult, StoredEntry};

#[derive(Clone)]
pub struct PgEventStore {
    db: PgPool,
}

impl PgEventStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some("23505"))
}

#[async_trait]
impl EventStore for PgEventStore {
    fn backend_name(&self) -> &'static str {
        "postgres"
    }

    async fn health_check(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").execute(&self.db).await?;
        Ok(())
    }

    async fn load(&self, collection: Collection) -> StoreResult<Vec<StoredEntry>> {
        let rows = sqlx::query_as::<_, (Uuid, serde_json::Value)>(
            r#"
            SELECT id, payload
            FROM farm_entries
            WHERE collection = $1
            ORDER BY seq ASC
            "#,
        )
        .bind(collection.key())
        .fetch_all(&self.db)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(id, payload)| StoredEntry { id, payload })
            .collect())
    }

    async fn append(&self, collection: Collection, entry: StoredEntry) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO farm_entries (id, collection, payload)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(entry.id)
        .bind(collection.key())
        .bind(&entry.payload)
        .execute(&self.db)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                StoreError::DuplicateEntry {
                    collection,
                    id: entry.id,
                }
            } else {
                StoreError::Database(e)
            }
        })?;

        Ok(())
    }

    async fn rewrite(&self, collection: Collection, entry: StoredEntry) -> StoreResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE farm_entries
            SET payload = $1, updated_at = NOW()
            WHERE collection = $2 AND id = $3
            "#,
        )
        .bind(&entry.payload)
        .bind(collection.key())
        .bind(entry.id)
        .execute(&self.db)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::EntryNotFound {
                collection,
                id: entry.id,
            });
        }
        Ok(())
    }

    async fn remove(&self, collection: Collection, id: Uuid) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM farm_entries WHERE collection = $1 AND id = $2")
            .bind(collection.key())
            .bind(id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::EntryNotFound { collection, id });
        }
        Ok(())
    }

    async fn load_settings(&self) -> StoreResult<Option<serde_json::Value>> {
        let settings = sqlx::query_scalar::<_, serde_json::Value>(
            "SELECT payload FROM farm_settings WHERE id = 1",
        )
        .fetch_optional(&self.db)
        .await?;

        Ok(settings)
    }

    async fn save_settings(&self, settings: serde_json::Value) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO farm_settings (id, payload, updated_at)
            VALUES (1, $1, NOW())
            ON CONFLICT (id)
            DO UPDATE SET payload = EXCLUDED.payload, updated_at = NOW()
            "#,
        )
        .bind(&settings)
        .execute(&self.db)
        .await?;

        Ok(())
    }
}
