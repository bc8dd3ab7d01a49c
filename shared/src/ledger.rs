//! Yield ledger
//!
//! Joins abortions and harvests to their blooms once and exposes the
//! per-bloom outstanding fruit count every other computation builds on.

use std::collections::HashMap;

use serde::Serialize;
use uuid::Uuid;

use crate::models::{AbortionEntry, BloomEntry, HarvestEntry};

/// Outstanding fruit for a bloom, floored at zero.
///
/// Entry-time validation should keep `aborted + harvested <= flower_count`,
/// but data that violates it is clamped here rather than rejected.
pub fn remaining_count(flower_count: u32, total_aborted: u32, total_harvested: u32) -> u32 {
    flower_count
        .saturating_sub(total_aborted)
        .saturating_sub(total_harvested)
}

/// Balance of one bloom
#[derive(Debug, Clone, Serialize)]
pub struct LedgerLine<'a> {
    pub bloom: &'a BloomEntry,
    pub total_aborted: u32,
    pub total_harvested: u32,
    pub remaining: u32,
}

impl LedgerLine<'_> {
    pub fn is_settled(&self) -> bool {
        self.remaining == 0
    }
}

/// Grouping index over the three event collections
#[derive(Debug, Clone)]
pub struct YieldLedger<'a> {
    blooms: &'a [BloomEntry],
    abortions: &'a [AbortionEntry],
    harvests: &'a [HarvestEntry],
    lines: Vec<LedgerLine<'a>>,
    line_index: HashMap<Uuid, usize>,
    abortions_by_bloom: HashMap<Uuid, Vec<&'a AbortionEntry>>,
    harvests_by_bloom: HashMap<Uuid, Vec<&'a HarvestEntry>>,
    orphan_abortions: usize,
    orphan_harvests: usize,
}

impl<'a> YieldLedger<'a> {
    /// Build the ledger in a single pass over each collection.
    ///
    /// Abortions and harvests whose bloom id matches no bloom are counted as
    /// orphans and otherwise ignored.
    pub fn build(
        blooms: &'a [BloomEntry],
        abortions: &'a [AbortionEntry],
        harvests: &'a [HarvestEntry],
    ) -> Self {
        let line_index: HashMap<Uuid, usize> = blooms
            .iter()
            .enumerate()
            .map(|(i, b)| (b.id, i))
            .collect();

        let mut abortions_by_bloom: HashMap<Uuid, Vec<&'a AbortionEntry>> = HashMap::new();
        let mut orphan_abortions = 0;
        for abortion in abortions {
            if line_index.contains_key(&abortion.bloom_entry_id) {
                abortions_by_bloom
                    .entry(abortion.bloom_entry_id)
                    .or_default()
                    .push(abortion);
            } else {
                orphan_abortions += 1;
            }
        }

        let mut harvests_by_bloom: HashMap<Uuid, Vec<&'a HarvestEntry>> = HashMap::new();
        let mut orphan_harvests = 0;
        for harvest in harvests {
            if line_index.contains_key(&harvest.bloom_entry_id) {
                harvests_by_bloom
                    .entry(harvest.bloom_entry_id)
                    .or_default()
                    .push(harvest);
            } else {
                orphan_harvests += 1;
            }
        }

        let lines = blooms
            .iter()
            .map(|bloom| {
                let total_aborted = abortions_by_bloom
                    .get(&bloom.id)
                    .map(|list| list.iter().fold(0u32, |acc, a| acc.saturating_add(a.aborted_count)))
                    .unwrap_or(0);
                let total_harvested = harvests_by_bloom
                    .get(&bloom.id)
                    .map(|list| list.iter().fold(0u32, |acc, h| acc.saturating_add(h.harvested_count)))
                    .unwrap_or(0);
                LedgerLine {
                    bloom,
                    total_aborted,
                    total_harvested,
                    remaining: remaining_count(bloom.flower_count, total_aborted, total_harvested),
                }
            })
            .collect();

        Self {
            blooms,
            abortions,
            harvests,
            lines,
            line_index,
            abortions_by_bloom,
            harvests_by_bloom,
            orphan_abortions,
            orphan_harvests,
        }
    }

    pub fn blooms(&self) -> &'a [BloomEntry] {
        self.blooms
    }

    /// Every abortion entry, orphans included
    pub fn abortions(&self) -> &'a [AbortionEntry] {
        self.abortions
    }

    /// Every harvest entry, orphans included
    pub fn harvests(&self) -> &'a [HarvestEntry] {
        self.harvests
    }

    /// All lines, in bloom collection order
    pub fn lines(&self) -> &[LedgerLine<'a>] {
        &self.lines
    }

    /// Lines that still have fruit outstanding
    pub fn outstanding(&self) -> impl Iterator<Item = &LedgerLine<'a>> {
        self.lines.iter().filter(|l| l.remaining > 0)
    }

    pub fn line(&self, bloom_id: Uuid) -> Option<&LedgerLine<'a>> {
        self.line_index.get(&bloom_id).map(|&i| &self.lines[i])
    }

    pub fn abortions_for(&self, bloom_id: Uuid) -> &[&'a AbortionEntry] {
        self.abortions_by_bloom
            .get(&bloom_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn harvests_for(&self, bloom_id: Uuid) -> &[&'a HarvestEntry] {
        self.harvests_by_bloom
            .get(&bloom_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Sum of outstanding fruit across all blooms
    pub fn total_remaining(&self) -> u64 {
        self.lines.iter().map(|l| u64::from(l.remaining)).sum()
    }

    pub fn orphan_abortions(&self) -> usize {
        self.orphan_abortions
    }

    pub fn orphan_harvests(&self) -> usize {
        self.orphan_harvests
    }
}
