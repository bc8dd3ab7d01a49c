//! Harvest forecasting
//!
//! Projects when each outstanding bloom becomes harvest-ready relative to an
//! explicit `today`, and orders the projections for presentation.

use std::cmp::Ordering;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::catalog::location_display_name;
use crate::ledger::{LedgerLine, YieldLedger};
use crate::models::FruitVariety;

/// Where a forecast sits relative to today
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ForecastStatus {
    ReadyToday,
    Overdue,
    Upcoming,
}

/// Derived projection for one bloom with fruit outstanding
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct HarvestForecast {
    pub bloom_entry_id: Uuid,
    pub location_id: String,
    pub location_name: String,
    pub variety: FruitVariety,
    pub bloom_date: NaiveDate,
    pub bloom_created_at: DateTime<Utc>,
    pub expected_harvest_date: NaiveDate,
    pub original_count: u32,
    pub total_aborted: u32,
    pub total_harvested: u32,
    pub remaining_count: u32,
    pub is_ready_today: bool,
    /// Days from today to the expected date; negative when overdue
    pub days_until_harvest: i64,
    pub status: ForecastStatus,
}

impl HarvestForecast {
    /// Project a single ledger line; does not check `remaining`
    pub fn from_line(line: &LedgerLine<'_>, today: NaiveDate) -> Self {
        let bloom = line.bloom;
        let expected = bloom.expected_harvest_date();
        let days_until_harvest = (expected - today).num_days();
        let status = match days_until_harvest.cmp(&0) {
            Ordering::Equal => ForecastStatus::ReadyToday,
            Ordering::Less => ForecastStatus::Overdue,
            Ordering::Greater => ForecastStatus::Upcoming,
        };

        Self {
            bloom_entry_id: bloom.id,
            location_id: bloom.location_id.clone(),
            location_name: location_display_name(&bloom.location_id),
            variety: bloom.variety,
            bloom_date: bloom.bloom_date,
            bloom_created_at: bloom.created_at,
            expected_harvest_date: expected,
            original_count: bloom.flower_count,
            total_aborted: line.total_aborted,
            total_harvested: line.total_harvested,
            remaining_count: line.remaining,
            is_ready_today: status == ForecastStatus::ReadyToday,
            days_until_harvest,
            status,
        }
    }
}

/// Forecasts for every bloom with fruit outstanding, in presentation order.
///
/// Blooms whose fruit has all been aborted or harvested are left out.
pub fn forecast_harvests(ledger: &YieldLedger<'_>, today: NaiveDate) -> Vec<HarvestForecast> {
    let mut forecasts: Vec<HarvestForecast> = ledger
        .outstanding()
        .map(|line| HarvestForecast::from_line(line, today))
        .collect();
    sort_forecasts(&mut forecasts);
    forecasts
}

/// Presentation order: ready-today first, then ascending by signed days, so
/// the most overdue bloom leads the overdue block and the soonest upcoming
/// bloom leads the rest. Ties fall back to bloom date, then when the bloom
/// was logged, then bloom id.
pub fn sort_forecasts(forecasts: &mut [HarvestForecast]) {
    forecasts.sort_by(compare_forecasts);
}

fn compare_forecasts(a: &HarvestForecast, b: &HarvestForecast) -> Ordering {
    b.is_ready_today
        .cmp(&a.is_ready_today)
        .then(a.days_until_harvest.cmp(&b.days_until_harvest))
        .then(a.bloom_date.cmp(&b.bloom_date))
        .then(a.bloom_created_at.cmp(&b.bloom_created_at))
        .then(a.bloom_entry_id.cmp(&b.bloom_entry_id))
}

/// Forecasts split into the three presentation sections
#[derive(Debug, Clone, Default, Serialize)]
pub struct ForecastSections {
    pub ready_today: Vec<HarvestForecast>,
    pub overdue: Vec<HarvestForecast>,
    pub upcoming: Vec<HarvestForecast>,
}

impl ForecastSections {
    /// Partition already-sorted forecasts, preserving their order
    pub fn from_sorted(forecasts: Vec<HarvestForecast>) -> Self {
        let mut sections = Self::default();
        for forecast in forecasts {
            match forecast.status {
                ForecastStatus::ReadyToday => sections.ready_today.push(forecast),
                ForecastStatus::Overdue => sections.overdue.push(forecast),
                ForecastStatus::Upcoming => sections.upcoming.push(forecast),
            }
        }
        sections
    }

    pub fn total_remaining(&self) -> u64 {
        self.ready_today
            .iter()
            .chain(&self.overdue)
            .chain(&self.upcoming)
            .map(|f| u64::from(f.remaining_count))
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{abortion, bloom, bloom_at, date, harvest};
    use chrono::TimeZone;

    #[test]
    fn test_single_bloom_forecast() {
        let blooms = vec![bloom(10)];
        let ledger = YieldLedger::build(&blooms, &[], &[]);

        let forecasts = forecast_harvests(&ledger, date(2024, 1, 20));
        assert_eq!(forecasts.len(), 1);
        let f = &forecasts[0];
        assert_eq!(f.expected_harvest_date, date(2024, 1, 27));
        assert_eq!(f.remaining_count, 10);
        assert_eq!(f.days_until_harvest, 7);
        assert_eq!(f.status, ForecastStatus::Upcoming);
        assert!(!f.is_ready_today);
        assert_eq!(f.location_name, "North Greenhouse 1 Row 1 Pole A");
    }

    #[test]
    fn test_ready_today_and_overdue_days() {
        let blooms = vec![bloom(10)];
        let ledger = YieldLedger::build(&blooms, &[], &[]);

        let ready = forecast_harvests(&ledger, date(2024, 1, 27));
        assert!(ready[0].is_ready_today);
        assert_eq!(ready[0].days_until_harvest, 0);
        assert_eq!(ready[0].status, ForecastStatus::ReadyToday);

        let overdue = forecast_harvests(&ledger, date(2024, 2, 3));
        assert_eq!(overdue[0].days_until_harvest, -7);
        assert_eq!(overdue[0].status, ForecastStatus::Overdue);
    }

    #[test]
    fn test_settled_blooms_are_excluded() {
        let blooms = vec![bloom(10), bloom(5)];
        let abortions = vec![abortion(blooms[0].id, date(2024, 1, 5), 3)];
        let harvests = vec![harvest(blooms[0].id, date(2024, 1, 27), 7)];
        let ledger = YieldLedger::build(&blooms, &abortions, &harvests);

        let forecasts = forecast_harvests(&ledger, date(2024, 1, 27));
        assert_eq!(forecasts.len(), 1);
        assert_eq!(forecasts[0].bloom_entry_id, blooms[1].id);
    }

    #[test]
    fn test_sort_order_ready_then_most_overdue_then_soonest() {
        let today = date(2024, 3, 1);
        let blooms = vec![
            bloom_at(date(2024, 2, 20), "N11B", FruitVariety::Red, 3, 30),   // upcoming, +20
            bloom_at(date(2024, 1, 31), "N11C", FruitVariety::Red, 3, 30),   // ready today
            bloom_at(date(2024, 1, 10), "N11D", FruitVariety::White, 3, 30), // overdue, -21
            bloom_at(date(2024, 1, 29), "N11E", FruitVariety::White, 3, 30), // overdue, -2
            bloom_at(date(2024, 2, 5), "N11F", FruitVariety::Yellow, 3, 30), // upcoming, +5
        ];
        let ledger = YieldLedger::build(&blooms, &[], &[]);

        let forecasts = forecast_harvests(&ledger, today);
        let order: Vec<&str> = forecasts.iter().map(|f| f.location_id.as_str()).collect();
        assert_eq!(order, vec!["N11C", "N11D", "N11E", "N11F", "N11B"]);
        let days: Vec<i64> = forecasts.iter().map(|f| f.days_until_harvest).collect();
        assert_eq!(days, vec![0, -21, -2, 5, 20]);
    }

    #[test]
    fn test_sort_is_idempotent_with_ties() {
        let today = date(2024, 3, 1);
        let blooms: Vec<_> = (0..6)
            .map(|i| bloom_at(date(2024, 2, 1 + (i % 2)), "NT1A", FruitVariety::Red, 2, 30))
            .collect();
        let ledger = YieldLedger::build(&blooms, &[], &[]);

        let sorted = forecast_harvests(&ledger, today);
        let mut resorted = sorted.clone();
        sort_forecasts(&mut resorted);
        assert_eq!(sorted, resorted);

        let mut reversed: Vec<_> = sorted.iter().rev().cloned().collect();
        sort_forecasts(&mut reversed);
        assert_eq!(sorted, reversed);
    }

    #[test]
    fn test_same_day_blooms_ordered_by_logging_time() {
        let today = date(2024, 3, 1);
        let mut later = bloom_at(date(2024, 2, 1), "N11A", FruitVariety::Red, 2, 30);
        let mut earlier = bloom_at(date(2024, 2, 1), "N11B", FruitVariety::Red, 2, 30);
        earlier.created_at = Utc.with_ymd_and_hms(2024, 2, 1, 6, 0, 0).unwrap();
        later.created_at = Utc.with_ymd_and_hms(2024, 2, 1, 18, 0, 0).unwrap();
        // Ids chosen so id order alone would put the later bloom first
        later.id = Uuid::from_u128(1);
        earlier.id = Uuid::from_u128(2);
        let blooms = vec![later, earlier];
        let ledger = YieldLedger::build(&blooms, &[], &[]);

        let order: Vec<String> = forecast_harvests(&ledger, today)
            .into_iter()
            .map(|f| f.location_id)
            .collect();
        assert_eq!(order, vec!["N11B", "N11A"]);
    }

    #[test]
    fn test_sections_partition_preserves_order() {
        let today = date(2024, 3, 1);
        let blooms = vec![
            bloom_at(date(2024, 1, 31), "N11A", FruitVariety::Red, 4, 30),
            bloom_at(date(2024, 1, 20), "N11B", FruitVariety::Red, 2, 30),
            bloom_at(date(2024, 2, 20), "N11C", FruitVariety::Red, 1, 30),
        ];
        let ledger = YieldLedger::build(&blooms, &[], &[]);

        let sections = ForecastSections::from_sorted(forecast_harvests(&ledger, today));
        assert_eq!(sections.ready_today.len(), 1);
        assert_eq!(sections.overdue.len(), 1);
        assert_eq!(sections.upcoming.len(), 1);
        assert_eq!(sections.total_remaining(), 7);
    }
}
