//! Reporting service for the dashboard, abortion analytics and yield

use chrono::NaiveDate;
use serde::Serialize;
use shared::{
    abortion_rates_by_location, abortion_rates_by_variety, build_dashboard, yield_by_variety,
    AbortionRate, DashboardOptions, DashboardSummary, VarietyYield,
};

use crate::error::{AppError, AppResult};

use super::entries::EntryRepository;

/// Reporting service
#[derive(Clone)]
pub struct ReportingService {
    entries: EntryRepository,
    dashboard_options: DashboardOptions,
    top_n: usize,
}

/// Abortion rates ranked by location and by variety
#[derive(Debug, Serialize)]
pub struct AbortionReport {
    pub by_location: Vec<AbortionRate>,
    pub by_variety: Vec<AbortionRate>,
    /// Abortions whose bloom no longer exists; excluded from the rates
    pub orphan_abortions: usize,
}

/// Fruit accounting per variety
#[derive(Debug, Serialize)]
pub struct YieldReport {
    pub by_variety: Vec<VarietyYield>,
    pub total_remaining: u64,
    pub orphan_harvests: usize,
}

impl ReportingService {
    /// `top_n` is the default length of the abortion rankings
    pub fn new(entries: EntryRepository, dashboard_options: DashboardOptions, top_n: usize) -> Self {
        Self {
            entries,
            dashboard_options,
            top_n,
        }
    }

    pub async fn dashboard(&self, today: NaiveDate) -> DashboardSummary {
        let snapshot = self.entries.load_snapshot().await;
        build_dashboard(&snapshot.ledger(), today, &self.dashboard_options)
    }

    pub async fn abortion_report(&self, limit: Option<usize>) -> AbortionReport {
        let top_n = limit.unwrap_or(self.top_n);
        let snapshot = self.entries.load_snapshot().await;
        let ledger = snapshot.ledger();

        let orphan_abortions = ledger.orphan_abortions();
        if orphan_abortions > 0 {
            tracing::warn!(orphan_abortions, "Abortions reference blooms that no longer exist");
        }

        AbortionReport {
            by_location: abortion_rates_by_location(&ledger, top_n),
            by_variety: abortion_rates_by_variety(&ledger, top_n),
            orphan_abortions,
        }
    }

    pub async fn yield_report(&self) -> YieldReport {
        let snapshot = self.entries.load_snapshot().await;
        let ledger = snapshot.ledger();
        YieldReport {
            by_variety: yield_by_variety(&ledger),
            total_remaining: ledger.total_remaining(),
            orphan_harvests: ledger.orphan_harvests(),
        }
    }

    /// Export rows to CSV, one record per row with a header line
    pub fn export_to_csv<T: Serialize>(data: &[T]) -> AppResult<String> {
        let mut wtr = csv::Writer::from_writer(vec![]);
        for record in data {
            wtr.serialize(record)
                .map_err(|e| AppError::Internal(format!("CSV serialization error: {}", e)))?;
        }
        let bytes = wtr
            .into_inner()
            .map_err(|e| AppError::Internal(format!("CSV writer error: {}", e)))?;
        String::from_utf8(bytes).map_err(|e| AppError::Internal(format!("UTF-8 conversion error: {}", e)))
    }
}
