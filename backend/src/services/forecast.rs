//! Harvest forecast service

use chrono::NaiveDate;
use shared::{forecast_harvests, ForecastSections, HarvestForecast};

use super::entries::EntryRepository;

#[derive(Clone)]
pub struct ForecastService {
    entries: EntryRepository,
}

impl ForecastService {
    pub fn new(entries: EntryRepository) -> Self {
        Self { entries }
    }

    /// Outstanding blooms, ready-today first then by days until harvest
    pub async fn forecast(&self, today: NaiveDate) -> Vec<HarvestForecast> {
        let snapshot = self.entries.load_snapshot().await;
        let forecasts = forecast_harvests(&snapshot.ledger(), today);
        tracing::debug!(%today, count = forecasts.len(), "Forecast computed");
        forecasts
    }

    /// The forecast split into ready today, overdue and upcoming
    pub async fn sections(&self, today: NaiveDate) -> ForecastSections {
        ForecastSections::from_sorted(self.forecast(today).await)
    }
}
