//! Day-scoped dashboard summary

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::analytics::{abortion_rates_by_location, AbortionRate, DASHBOARD_TOP_N};
use crate::forecast::HarvestForecast;
use crate::ledger::YieldLedger;
use crate::models::ReadyTodayPolicy;

/// Tunables for [`build_dashboard`]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DashboardOptions {
    /// Days after today covered by the upcoming list (inclusive)
    pub upcoming_window_days: u32,
    /// Maximum rows in the upcoming list
    pub upcoming_limit: usize,
    /// Maximum rows in the abortion hotspot list
    pub hotspot_limit: usize,
    pub ready_today_policy: ReadyTodayPolicy,
}

impl Default for DashboardOptions {
    fn default() -> Self {
        Self {
            upcoming_window_days: 7,
            upcoming_limit: 5,
            hotspot_limit: DASHBOARD_TOP_N,
            ready_today_policy: ReadyTodayPolicy::default(),
        }
    }
}

/// Counters and short lists for one calendar day
#[derive(Debug, Clone, Serialize)]
pub struct DashboardSummary {
    pub date: NaiveDate,
    pub today_blooms: usize,
    pub today_abortions: usize,
    pub today_harvests: usize,
    pub ready_to_harvest_today: usize,
    /// Fruit still outstanding across every bloom
    pub total_active_blooms: u64,
    pub upcoming_harvests: Vec<HarvestForecast>,
    pub abortion_hotspots: Vec<AbortionRate>,
}

pub fn build_dashboard(
    ledger: &YieldLedger<'_>,
    today: NaiveDate,
    options: &DashboardOptions,
) -> DashboardSummary {
    let today_blooms = ledger.blooms().iter().filter(|b| b.bloom_date == today).count();
    let today_abortions = ledger
        .abortions()
        .iter()
        .filter(|a| a.abortion_date == today)
        .count();
    let today_harvests = ledger
        .harvests()
        .iter()
        .filter(|h| h.harvest_date == today)
        .count();

    let ready_to_harvest_today = ledger
        .lines()
        .iter()
        .filter(|l| l.bloom.expected_harvest_date() == today)
        .filter(|l| match options.ready_today_policy {
            ReadyTodayPolicy::AllBlooms => true,
            ReadyTodayPolicy::OutstandingOnly => l.remaining > 0,
        })
        .count();

    let window_end = today
        .checked_add_days(Days::new(u64::from(options.upcoming_window_days)))
        .unwrap_or(NaiveDate::MAX);
    let mut upcoming_harvests: Vec<HarvestForecast> = ledger
        .outstanding()
        .filter(|l| {
            let expected = l.bloom.expected_harvest_date();
            today <= expected && expected <= window_end
        })
        .map(|l| HarvestForecast::from_line(l, today))
        .collect();
    upcoming_harvests.sort_by(|a, b| {
        a.expected_harvest_date
            .cmp(&b.expected_harvest_date)
            .then(a.bloom_date.cmp(&b.bloom_date))
            .then(a.bloom_entry_id.cmp(&b.bloom_entry_id))
    });
    upcoming_harvests.truncate(options.upcoming_limit);

    tracing::debug!(
        %today,
        today_blooms,
        ready_to_harvest_today,
        "dashboard computed"
    );

    DashboardSummary {
        date: today,
        today_blooms,
        today_abortions,
        today_harvests,
        ready_to_harvest_today,
        total_active_blooms: ledger.total_remaining(),
        upcoming_harvests,
        abortion_hotspots: abortion_rates_by_location(ledger, options.hotspot_limit),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{abortion, bloom, bloom_at, date, harvest};
    use crate::models::FruitVariety;
    use uuid::Uuid;

    #[test]
    fn test_today_counters() {
        let today = date(2024, 1, 5);
        let blooms = vec![
            bloom_at(today, "N11A", FruitVariety::Red, 6, 30),
            bloom_at(today, "N11B", FruitVariety::Red, 6, 30),
            bloom_at(date(2024, 1, 1), "N11C", FruitVariety::Red, 6, 30),
        ];
        let abortions = vec![
            abortion(blooms[2].id, today, 1),
            abortion(Uuid::new_v4(), today, 1),
            abortion(blooms[2].id, date(2024, 1, 4), 1),
        ];
        let ledger = YieldLedger::build(&blooms, &abortions, &[]);

        let summary = build_dashboard(&ledger, today, &DashboardOptions::default());
        assert_eq!(summary.today_blooms, 2);
        assert_eq!(summary.today_abortions, 2);
        assert_eq!(summary.today_harvests, 0);
        assert_eq!(summary.total_active_blooms, 16);
    }

    #[test]
    fn test_ready_today_policy() {
        let today = date(2024, 1, 27);
        let blooms = vec![bloom(10), bloom(4)];
        let harvests = vec![harvest(blooms[0].id, today, 10)];
        let ledger = YieldLedger::build(&blooms, &[], &harvests);

        let all = build_dashboard(&ledger, today, &DashboardOptions::default());
        assert_eq!(all.ready_to_harvest_today, 2);
        assert_eq!(all.today_harvests, 1);

        let outstanding = build_dashboard(
            &ledger,
            today,
            &DashboardOptions {
                ready_today_policy: ReadyTodayPolicy::OutstandingOnly,
                ..DashboardOptions::default()
            },
        );
        assert_eq!(outstanding.ready_to_harvest_today, 1);
    }

    #[test]
    fn test_upcoming_window_is_inclusive_and_sorted() {
        let today = date(2024, 3, 1);
        let blooms = vec![
            bloom_at(date(2024, 2, 7), "N11A", FruitVariety::Red, 2, 30),  // Mar 8, edge
            bloom_at(date(2024, 2, 8), "N11B", FruitVariety::Red, 2, 30),  // Mar 9, outside
            bloom_at(date(2024, 1, 31), "N11C", FruitVariety::Red, 2, 30), // Mar 1, today
            bloom_at(date(2024, 1, 30), "N11D", FruitVariety::Red, 2, 30), // Feb 29, overdue
            bloom_at(date(2024, 2, 3), "N11E", FruitVariety::Red, 2, 30),  // Mar 4
        ];
        let ledger = YieldLedger::build(&blooms, &[], &[]);

        let summary = build_dashboard(&ledger, today, &DashboardOptions::default());
        let ids: Vec<&str> = summary
            .upcoming_harvests
            .iter()
            .map(|f| f.location_id.as_str())
            .collect();
        assert_eq!(ids, vec!["N11C", "N11E", "N11A"]);
    }

    #[test]
    fn test_upcoming_excludes_settled_and_truncates() {
        let today = date(2024, 1, 27);
        let blooms: Vec<_> = (0..7).map(|_| bloom(3)).collect();
        let harvests = vec![harvest(blooms[0].id, today, 3)];
        let ledger = YieldLedger::build(&blooms, &[], &harvests);

        let summary = build_dashboard(&ledger, today, &DashboardOptions::default());
        assert_eq!(summary.upcoming_harvests.len(), 5);
        assert!(summary
            .upcoming_harvests
            .iter()
            .all(|f| f.bloom_entry_id != blooms[0].id));
        assert_eq!(summary.total_active_blooms, 18);
    }

    #[test]
    fn test_hotspots_limited() {
        let d = date(2024, 1, 1);
        let blooms: Vec<_> = ["N11A", "N11B", "N11C", "N11D", "N11E", "N11F", "N11G"]
            .iter()
            .map(|loc| bloom_at(d, loc, FruitVariety::White, 10, 30))
            .collect();
        let abortions: Vec<_> = blooms.iter().map(|b| abortion(b.id, d, 1)).collect();
        let ledger = YieldLedger::build(&blooms, &abortions, &[]);

        let summary = build_dashboard(&ledger, d, &DashboardOptions::default());
        assert_eq!(summary.abortion_hotspots.len(), DASHBOARD_TOP_N);
    }
}
