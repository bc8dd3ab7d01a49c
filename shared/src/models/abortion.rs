//! Abortion models

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::MediaReference;

/// A recorded loss of flowers from one bloom before harvest
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AbortionEntry {
    pub id: Uuid,
    pub abortion_date: NaiveDate,
    pub bloom_entry_id: Uuid,
    pub aborted_count: u32,
    pub note: Option<String>,
    pub photo: Option<MediaReference>,
    pub created_at: DateTime<Utc>,
}
