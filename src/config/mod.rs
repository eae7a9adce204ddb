//! Configuration loading and management for the tariff pricing engine.
//!
//! This module loads the carrier catalogue, discount records and engine
//! settings from YAML files, and validates the data once at load time.
//!
//! # Example
//!
//! ```no_run
//! use tariff_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/default").unwrap();
//! for warning in config.config().data_warnings() {
//!     println!("{}: {}", warning.code, warning.message);
//! }
//! ```

mod loader;
mod types;
mod validation;

pub use loader::ConfigLoader;
pub use types::{
    CarriersConfig, CatalogueConfig, DiscountsConfig, EngineSettings, GLS_CARRIER_NAME,
    MarginThresholds, TollOverride, TollOverrideTable, gls_fixed_toll_fee,
};
pub use validation::{
    INVERTED_WEIGHT_RANGE, NON_POSITIVE_PURCHASE_PRICE, OVERLAPPING_VOLUME_BANDS,
    OVERLAPPING_WEIGHT_RANGES, validate_catalogue,
};
