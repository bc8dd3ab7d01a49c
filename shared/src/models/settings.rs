//! Farm settings models

use serde::{Deserialize, Serialize};

use super::FruitVariety;

/// Default maturity period for new blooms, in days
pub const DEFAULT_MATURITY_PERIOD_DAYS: u32 = 30;

/// User-editable settings consumed by the bloom logging workflow.
///
/// Forecasts never read these: every bloom carries the maturity period that
/// was current when it was logged.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FarmSettings {
    pub maturity_period_days: u32,
    pub default_variety: FruitVariety,
}

impl Default for FarmSettings {
    fn default() -> Self {
        Self {
            maturity_period_days: DEFAULT_MATURITY_PERIOD_DAYS,
            default_variety: FruitVariety::Red,
        }
    }
}

/// Which blooms the dashboard counts as "ready to harvest today"
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ReadyTodayPolicy {
    /// Every bloom whose expected date is today, even if already fully
    /// aborted or harvested
    #[default]
    AllBlooms,
    /// Only blooms that still have fruit outstanding; matches the
    /// ready-today section of the forecast list
    OutstandingOnly,
}
