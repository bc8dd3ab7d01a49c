//! Farm settings service

use serde::Deserialize;
use shared::{validate_maturity_period, FarmSettings, FruitVariety};

use crate::error::AppResult;

use super::entries::EntryRepository;

#[derive(Clone)]
pub struct SettingsService {
    entries: EntryRepository,
    defaults: FarmSettings,
}

/// Partial settings update
#[derive(Debug, Deserialize)]
pub struct UpdateSettingsInput {
    pub maturity_period_days: Option<i64>,
    pub default_variety: Option<FruitVariety>,
}

impl SettingsService {
    /// `defaults` apply until the farmer saves settings of their own
    pub fn new(entries: EntryRepository, defaults: FarmSettings) -> Self {
        Self { entries, defaults }
    }

    pub async fn get_settings(&self) -> FarmSettings {
        self.entries
            .load_settings()
            .await
            .unwrap_or_else(|| self.defaults.clone())
    }

    /// Apply and persist a partial update.
    ///
    /// Existing blooms keep the maturity period they were logged with.
    pub async fn update_settings(&self, input: UpdateSettingsInput) -> AppResult<FarmSettings> {
        let mut settings = self.get_settings().await;

        if let Some(days) = input.maturity_period_days {
            settings.maturity_period_days = validate_maturity_period(days)?;
        }
        if let Some(variety) = input.default_variety {
            settings.default_variety = variety;
        }

        self.entries.save_settings(&settings).await?;
        tracing::info!(
            maturity_period_days = settings.maturity_period_days,
            default_variety = %settings.default_variety,
            "Settings updated"
        );
        Ok(settings)
    }
}
