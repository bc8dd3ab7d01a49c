//! Abortion and yield analytics

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::catalog::location_display_name;
use crate::ledger::{LedgerLine, YieldLedger};
use crate::models::FruitVariety;

/// Rows kept in catalog-wide abortion rankings
pub const CATALOG_TOP_N: usize = 10;
/// Rows kept in dashboard abortion summaries
pub const DASHBOARD_TOP_N: usize = 5;

/// Abortion rate of one group (a location or a variety)
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AbortionRate {
    /// Group key: location id or variety code
    pub group: String,
    pub label: String,
    pub total_flowers: u64,
    pub aborted: u64,
    /// Percentage in [0, 100], two decimal places
    pub rate_percent: Decimal,
}

/// `part / total * 100` rounded to two places, or zero for an empty total
pub fn percentage(part: u64, total: u64) -> Decimal {
    if total == 0 {
        return Decimal::ZERO;
    }
    (Decimal::from(part) * Decimal::ONE_HUNDRED / Decimal::from(total)).round_dp(2)
}

/// Share of flowers lost to abortion, or zero when nothing bloomed
pub fn abortion_rate(aborted: u64, total: u64) -> Decimal {
    percentage(aborted, total)
}

/// Locations ranked by abortion rate, highest first
pub fn abortion_rates_by_location(ledger: &YieldLedger<'_>, top_n: usize) -> Vec<AbortionRate> {
    let groups = group_abortions(ledger, |line| line.bloom.location_id.clone());
    rank(
        groups
            .into_iter()
            .map(|(location_id, (total, aborted))| AbortionRate {
                label: location_display_name(&location_id),
                group: location_id,
                total_flowers: total,
                aborted,
                rate_percent: abortion_rate(aborted, total),
            })
            .collect(),
        top_n,
    )
}

/// Varieties ranked by abortion rate, highest first
pub fn abortion_rates_by_variety(ledger: &YieldLedger<'_>, top_n: usize) -> Vec<AbortionRate> {
    let groups = group_abortions(ledger, |line| line.bloom.variety);
    rank(
        groups
            .into_iter()
            .map(|(variety, (total, aborted))| AbortionRate {
                group: variety.code().to_string(),
                label: variety.to_string(),
                total_flowers: total,
                aborted,
                rate_percent: abortion_rate(aborted, total),
            })
            .collect(),
        top_n,
    )
}

/// Sum (flowers, aborted) per group. Aborted counts are capped at each
/// bloom's flower count so over-abortion cannot push a rate past 100%.
fn group_abortions<K, F>(ledger: &YieldLedger<'_>, key: F) -> BTreeMap<K, (u64, u64)>
where
    K: Ord,
    F: Fn(&LedgerLine<'_>) -> K,
{
    let mut groups: BTreeMap<K, (u64, u64)> = BTreeMap::new();
    for line in ledger.lines() {
        let flowers = u64::from(line.bloom.flower_count);
        let aborted = u64::from(line.total_aborted.min(line.bloom.flower_count));
        let entry = groups.entry(key(line)).or_insert((0, 0));
        entry.0 += flowers;
        entry.1 += aborted;
    }
    groups
}

fn rank(mut rates: Vec<AbortionRate>, top_n: usize) -> Vec<AbortionRate> {
    rates.retain(|r| r.total_flowers > 0);
    rates.sort_by(|a, b| {
        b.rate_percent
            .cmp(&a.rate_percent)
            .then_with(|| a.group.cmp(&b.group))
    });
    rates.truncate(top_n);
    rates
}

/// Bloom-to-harvest totals for one variety
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct VarietyYield {
    pub variety: FruitVariety,
    pub bloom_count: usize,
    pub total_flowers: u64,
    pub aborted: u64,
    pub harvested: u64,
    pub remaining: u64,
    /// Harvested fruit as a share of flowers, two decimal places
    pub harvest_rate_percent: Decimal,
}

/// Yield summary for every variety with at least one bloom
pub fn yield_by_variety(ledger: &YieldLedger<'_>) -> Vec<VarietyYield> {
    FruitVariety::ALL
        .into_iter()
        .filter_map(|variety| {
            let lines: Vec<_> = ledger
                .lines()
                .iter()
                .filter(|l| l.bloom.variety == variety)
                .collect();
            if lines.is_empty() {
                return None;
            }
            let total_flowers: u64 = lines.iter().map(|l| u64::from(l.bloom.flower_count)).sum();
            let harvested: u64 = lines.iter().map(|l| u64::from(l.total_harvested)).sum();
            Some(VarietyYield {
                variety,
                bloom_count: lines.len(),
                total_flowers,
                aborted: lines.iter().map(|l| u64::from(l.total_aborted)).sum(),
                harvested,
                remaining: lines.iter().map(|l| u64::from(l.remaining)).sum(),
                harvest_rate_percent: percentage(harvested.min(total_flowers), total_flowers),
            })
        })
        .collect()
}
