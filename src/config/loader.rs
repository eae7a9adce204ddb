//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading the tariff
//! catalogue from YAML files.

use std::fs;
use std::path::Path;

use tracing::info;

use crate::error::{EngineError, EngineResult};
use crate::models::{Carrier, Service};

use super::types::{CarriersConfig, CatalogueConfig, DiscountsConfig, EngineSettings};

/// Loads and provides access to the tariff catalogue.
///
/// # Directory Structure
///
/// ```text
/// config/default/
/// ├── engine.yaml     # Margin thresholds and toll overrides
/// ├── carriers.yaml   # Carriers, services, pricing and weight ranges
/// └── discounts.yaml  # Volume discounts, promotions and additional fees
/// ```
///
/// # Example
///
/// ```no_run
/// use tariff_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/default").unwrap();
/// let (carrier, service) = loader.get_service("gls", "BUSINESS").unwrap();
/// println!("{} {}", carrier.name, service.name);
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: CatalogueConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` instance on success, or an error if:
    /// - Any required file is missing
    /// - Any file contains invalid YAML
    /// - Any required field is missing from the configuration
    ///
    /// Overlapping weight ranges or volume bands do not fail the load; they are
    /// available from [`CatalogueConfig::data_warnings`].
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let settings = Self::load_yaml::<EngineSettings>(&path.join("engine.yaml"))?;
        let carriers = Self::load_yaml::<CarriersConfig>(&path.join("carriers.yaml"))?;
        let discounts = Self::load_yaml::<DiscountsConfig>(&path.join("discounts.yaml"))?;

        let config = CatalogueConfig::new(settings, carriers.carriers, discounts);

        info!(
            path = %path.display(),
            carriers = config.carriers().len(),
            volume_discounts = config.volume_discounts().len(),
            promotions = config.promotions().len(),
            data_warnings = config.data_warnings().len(),
            "Loaded tariff catalogue"
        );

        Ok(Self { config })
    }

    /// Wraps an already-assembled catalogue.
    pub fn from_config(config: CatalogueConfig) -> Self {
        Self { config }
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Returns the underlying catalogue.
    pub fn config(&self) -> &CatalogueConfig {
        &self.config
    }

    /// Gets a carrier by its id.
    pub fn get_carrier(&self, carrier_id: &str) -> EngineResult<&Carrier> {
        self.config
            .carriers()
            .iter()
            .find(|c| c.id == carrier_id)
            .ok_or_else(|| EngineError::CarrierNotFound {
                carrier_id: carrier_id.to_string(),
            })
    }

    /// Gets a carrier and one of its services by service code.
    pub fn get_service(
        &self,
        carrier_id: &str,
        service_code: &str,
    ) -> EngineResult<(&Carrier, &Service)> {
        let carrier = self.get_carrier(carrier_id)?;
        let service = carrier
            .service(service_code)
            .ok_or_else(|| EngineError::ServiceNotFound {
                carrier_id: carrier_id.to_string(),
                service_code: service_code.to_string(),
            })?;
        Ok((carrier, service))
    }
}
