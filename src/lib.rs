pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{LocalStorage, PlanningImport};
pub use config::{Settings, SettingsStore, TomlConfig};
pub use core::engine::CostingEngine;
pub use domain::fleet::{VehicleCatalog, VehicleClass, ZonePrices};
pub use domain::model::{CommuteRecord, Direction};
pub use domain::report::CostBreakdown;
pub use utils::error::{CostError, Result};
