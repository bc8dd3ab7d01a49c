//! Entry builders for unit tests

use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use crate::models::{AbortionEntry, BloomEntry, FruitVariety, HarvestEntry};

pub(crate) fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub(crate) fn bloom_at(
    bloom_date: NaiveDate,
    location_id: &str,
    variety: FruitVariety,
    flower_count: u32,
    maturity_period_days: u32,
) -> BloomEntry {
    BloomEntry {
        id: Uuid::new_v4(),
        bloom_date,
        location_id: location_id.to_string(),
        variety,
        flower_count,
        maturity_period_days,
        photo: None,
        note: None,
        created_at: Utc::now(),
    }
}

pub(crate) fn bloom(flower_count: u32) -> BloomEntry {
    bloom_at(date(2024, 1, 1), "N11A", FruitVariety::Red, flower_count, 26)
}

pub(crate) fn abortion(bloom_entry_id: Uuid, abortion_date: NaiveDate, aborted_count: u32) -> AbortionEntry {
    AbortionEntry {
        id: Uuid::new_v4(),
        abortion_date,
        bloom_entry_id,
        aborted_count,
        note: None,
        photo: None,
        created_at: Utc::now(),
    }
}

pub(crate) fn harvest(bloom_entry_id: Uuid, harvest_date: NaiveDate, harvested_count: u32) -> HarvestEntry {
    HarvestEntry {
        id: Uuid::new_v4(),
        harvest_date,
        bloom_entry_id,
        harvested_count,
        note: None,
        photo: None,
        created_at: Utc::now(),
    }
}
