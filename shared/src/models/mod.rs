//! Domain models for the Pitaya Bloom Tracker

mod abortion;
mod bloom;
mod harvest;
mod location;
mod settings;

pub use abortion::*;
pub use bloom::*;
pub use harvest::*;
pub use location::*;
pub use settings::*;
