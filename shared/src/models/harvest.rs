//! Harvest models

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::MediaReference;

/// Fruit physically collected from one bloom
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HarvestEntry {
    pub id: Uuid,
    pub harvest_date: NaiveDate,
    pub bloom_entry_id: Uuid,
    pub harvested_count: u32,
    pub note: Option<String>,
    pub photo: Option<MediaReference>,
    pub created_at: DateTime<Utc>,
}
