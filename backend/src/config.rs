//! Configuration management for the Pitaya Bloom Tracker
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (development.toml, production.toml)
//! 3. Environment variable overrides with PBT_ prefix

use config::{ConfigError, Environment, File};
use serde::Deserialize;
use shared::{DashboardOptions, FarmSettings, FruitVariety, ReadyTodayPolicy};

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Server configuration
    pub server: ServerConfig,

    /// Entry storage configuration
    pub storage: StorageConfig,

    /// Defaults for new blooms until the farmer saves settings
    pub farm: FarmConfig,

    /// Forecast and dashboard tunables
    pub forecast: ForecastConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server port
    pub port: u16,

    /// Server host
    pub host: String,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Memory,
    Postgres,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    pub backend: StorageBackend,

    /// PostgreSQL connection URL, required for the postgres backend
    pub database_url: Option<String>,

    /// Maximum number of connections in the pool
    pub max_connections: u32,

    /// Minimum number of connections in the pool
    pub min_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct FarmConfig {
    pub maturity_period_days: u32,
    pub default_variety: FruitVariety,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ForecastConfig {
    /// Days after today shown in the dashboard's upcoming list
    pub upcoming_window_days: u32,

    /// Rows in dashboard lists
    pub dashboard_limit: usize,

    /// Rows in catalog-wide abortion rankings
    pub analytics_top_n: usize,

    pub ready_today_policy: ReadyTodayPolicy,
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment = std::env::var("PBT_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let forecast = ForecastConfig::default();

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("server.port", 3000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("storage.backend", "memory")?
            .set_default("storage.max_connections", 5)?
            .set_default("storage.min_connections", 1)?
            .set_default("farm.maturity_period_days", i64::from(shared::DEFAULT_MATURITY_PERIOD_DAYS))?
            .set_default("farm.default_variety", "red")?
            .set_default("forecast.upcoming_window_days", i64::from(forecast.upcoming_window_days))?
            .set_default("forecast.dashboard_limit", forecast.dashboard_limit as i64)?
            .set_default("forecast.analytics_top_n", forecast.analytics_top_n as i64)?
            .set_default("forecast.ready_today_policy", "all_blooms")?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (PBT_ prefix)
            .add_source(
                Environment::with_prefix("PBT")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: Config = config.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.storage.backend == StorageBackend::Postgres && self.storage.database_url.is_none() {
            return Err(ConfigError::Message(
                "storage.database_url is required when storage.backend = postgres".to_string(),
            ));
        }
        shared::validate_settings(&self.farm.default_settings())
            .map_err(|e| ConfigError::Message(format!("farm: {}", e)))?;
        Ok(())
    }
}

impl FarmConfig {
    pub fn default_settings(&self) -> FarmSettings {
        FarmSettings {
            maturity_period_days: self.maturity_period_days,
            default_variety: self.default_variety,
        }
    }
}

impl ForecastConfig {
    pub fn dashboard_options(&self) -> DashboardOptions {
        DashboardOptions {
            upcoming_window_days: self.upcoming_window_days,
            upcoming_limit: self.dashboard_limit,
            hotspot_limit: self.dashboard_limit,
            ready_today_policy: self.ready_today_policy,
        }
    }
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            upcoming_window_days: 7,
            dashboard_limit: 5,
            analytics_top_n: shared::CATALOG_TOP_N,
            ready_today_policy: ReadyTodayPolicy::AllBlooms,
        }
    }
}
