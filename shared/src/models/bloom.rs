//! Bloom models

use chrono::{DateTime, Days, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::MediaReference;

/// A recorded flowering event at one farm location
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BloomEntry {
    pub id: Uuid,
    pub bloom_date: NaiveDate,
    /// Key into the location catalog; not checked against it on write
    pub location_id: String,
    pub variety: FruitVariety,
    pub flower_count: u32,
    /// Days from bloom to expected harvest, captured when the bloom was logged
    pub maturity_period_days: u32,
    pub photo: Option<MediaReference>,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl BloomEntry {
    /// Date the fruit from this bloom is expected to be ready.
    ///
    /// Plain calendar addition; saturates at the bloom date if the sum
    /// would overflow the supported date range.
    pub fn expected_harvest_date(&self) -> NaiveDate {
        self.bloom_date
            .checked_add_days(Days::new(u64::from(self.maturity_period_days)))
            .unwrap_or(self.bloom_date)
    }
}

/// Dragon-fruit varieties grown on the farm
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[serde(rename_all = "lowercase")]
pub enum FruitVariety {
    #[default]
    Red,
    White,
    Yellow,
}

impl FruitVariety {
    pub const ALL: [FruitVariety; 3] = [FruitVariety::Red, FruitVariety::White, FruitVariety::Yellow];

    pub fn code(&self) -> &'static str {
        match self {
            FruitVariety::Red => "red",
            FruitVariety::White => "white",
            FruitVariety::Yellow => "yellow",
        }
    }
}

impl std::fmt::Display for FruitVariety {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FruitVariety::Red => write!(f, "Red"),
            FruitVariety::White => write!(f, "White"),
            FruitVariety::Yellow => write!(f, "Yellow"),
        }
    }
}

impl std::str::FromStr for FruitVariety {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "red" => Ok(FruitVariety::Red),
            "white" => Ok(FruitVariety::White),
            "yellow" => Ok(FruitVariety::Yellow),
            other => Err(format!("Unknown fruit variety: {}", other)),
        }
    }
}
