//! Business logic services

pub mod abortion;
pub mod bloom;
pub mod entries;
pub mod forecast;
pub mod harvest;
pub mod reporting;
pub mod settings;

pub use abortion::AbortionService;
pub use bloom::BloomService;
pub use entries::{EntryFilter, EntryRepository, EventSnapshot};
pub use forecast::ForecastService;
pub use harvest::HarvestService;
pub use reporting::ReportingService;
pub use settings::SettingsService;
