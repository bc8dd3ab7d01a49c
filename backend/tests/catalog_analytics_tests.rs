//! Location catalog and abortion analytics tests
//!
//! Covers:
//! - Catalog size, uniqueness and id resolution
//! - Abortion rates stay within 0..=100 and rank by rate
//! - Dashboard ready-today policies
//! - Entry count validation

use chrono::{NaiveDate, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;
use shared::{
    abortion_rates_by_location, build_dashboard, find_location, generate_catalog, location_display_name,
    locations_by_type, parse_count, validate_count, AbortionEntry, BloomEntry, DashboardOptions,
    FruitVariety, HarvestEntry, ReadyTodayPolicy, StructureType, YieldLedger, CATALOG_SIZE,
};
use std::collections::HashSet;
use uuid::Uuid;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn bloom(location_id: &str, flower_count: u32) -> BloomEntry {
    BloomEntry {
        id: Uuid::new_v4(),
        bloom_date: date(2024, 1, 1),
        location_id: location_id.to_string(),
        variety: FruitVariety::Red,
        flower_count,
        maturity_period_days: 30,
        photo: None,
        note: None,
        created_at: Utc::now(),
    }
}

fn abortion(bloom_entry_id: Uuid, aborted_count: u32) -> AbortionEntry {
    AbortionEntry {
        id: Uuid::new_v4(),
        abortion_date: date(2024, 1, 6),
        bloom_entry_id,
        aborted_count,
        note: None,
        photo: None,
        created_at: Utc::now(),
    }
}

// ============================================================================
// Catalog
// ============================================================================

#[test]
fn test_catalog_has_392_unique_locations() {
    let catalog = generate_catalog();
    assert_eq!(catalog.len(), 392);
    assert_eq!(CATALOG_SIZE, 392);

    let ids: HashSet<&str> = catalog.iter().map(|l| l.id.as_str()).collect();
    assert_eq!(ids.len(), 392);
}

#[test]
fn test_catalog_breakdown() {
    assert_eq!(locations_by_type(StructureType::Greenhouse).len(), 288);
    assert_eq!(locations_by_type(StructureType::Trellis).len(), 80);
    assert_eq!(locations_by_type(StructureType::DoublePole).len(), 24);
}

#[test]
fn test_every_catalog_id_resolves() {
    for location in generate_catalog() {
        assert_eq!(find_location(&location.id).as_ref(), Some(&location));
        assert_eq!(location_display_name(&location.id), location.name);
    }
}

proptest! {
    /// Ids outside the catalog never resolve and display as themselves
    #[test]
    fn test_unknown_ids_fall_back(id in "[A-Za-z0-9 ]{0,8}") {
        let catalog_ids: HashSet<String> = generate_catalog().into_iter().map(|l| l.id).collect();
        prop_assume!(!catalog_ids.contains(&id));
        prop_assert!(find_location(&id).is_none());
        prop_assert_eq!(location_display_name(&id), id);
    }

    /// Rates stay in range and the ranking is by rate descending
    #[test]
    fn test_abortion_rates_bounded_and_ranked(
        counts in prop::collection::vec((1..=40u32, 0..=80u32), 1..20)
    ) {
        let catalog = generate_catalog();
        let blooms: Vec<BloomEntry> = counts
            .iter()
            .enumerate()
            .map(|(i, (flowers, _))| bloom(&catalog[i % catalog.len()].id, *flowers))
            .collect();
        let abortions: Vec<AbortionEntry> = blooms
            .iter()
            .zip(&counts)
            .map(|(b, (_, aborted))| abortion(b.id, *aborted))
            .collect();
        let ledger = YieldLedger::build(&blooms, &abortions, &[]);

        let rates = abortion_rates_by_location(&ledger, 10);
        prop_assert!(rates.len() <= 10);
        for rate in &rates {
            prop_assert!(rate.rate_percent >= Decimal::ZERO);
            prop_assert!(rate.rate_percent <= Decimal::from(100));
            prop_assert!(rate.aborted <= rate.total_flowers);
        }
        for pair in rates.windows(2) {
            prop_assert!(pair[0].rate_percent >= pair[1].rate_percent);
        }
    }

    /// Counts are accepted exactly when positive and within bounds
    #[test]
    fn test_count_validation(value in -1000i64..20_000) {
        let result = validate_count("flower_count", value);
        prop_assert_eq!(result.is_ok(), (1..=10_000).contains(&value));
        prop_assert_eq!(parse_count("flower_count", &value.to_string()).is_ok(), result.is_ok());
    }
}

#[test]
fn test_parse_count_rejects_text() {
    assert!(parse_count("aborted_count", "three").is_err());
    assert!(parse_count("aborted_count", "").is_err());
    assert_eq!(parse_count("aborted_count", " 3 ").unwrap(), 3);
}

// ============================================================================
// Dashboard
// ============================================================================

#[test]
fn test_ready_today_policies_differ_on_settled_blooms() {
    let settled = bloom("N11A", 5);
    let open = bloom("N11B", 5);
    let harvests = vec![HarvestEntry {
        id: Uuid::new_v4(),
        harvest_date: date(2024, 1, 31),
        bloom_entry_id: settled.id,
        harvested_count: 5,
        note: None,
        photo: None,
        created_at: Utc::now(),
    }];
    let blooms = vec![settled, open];
    let ledger = YieldLedger::build(&blooms, &[], &harvests);
    let today = date(2024, 1, 31);

    let all = build_dashboard(&ledger, today, &DashboardOptions::default());
    assert_eq!(all.ready_to_harvest_today, 2);

    let outstanding = build_dashboard(
        &ledger,
        today,
        &DashboardOptions {
            ready_today_policy: ReadyTodayPolicy::OutstandingOnly,
            ..DashboardOptions::default()
        },
    );
    assert_eq!(outstanding.ready_to_harvest_today, 1);
    assert_eq!(outstanding.upcoming_harvests.len(), 1);
    assert_eq!(outstanding.total_active_blooms, 5);
}
