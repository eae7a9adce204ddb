//! Carrier, service and destination models.
//!
//! A [`Carrier`] owns its [`Service`]s, and each service owns the
//! [`Pricing`] entries that hold its weight-banded tariffs.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Pricing;

/// The destination class a service or pricing entry covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DestinationType {
    /// Deliveries within the reseller's own country.
    National,
    /// Deliveries to European Union countries.
    Eu,
    /// Deliveries outside the European Union.
    ExtraEu,
}

impl DestinationType {
    /// Returns the snake_case label used in configuration and audit output.
    pub fn as_str(&self) -> &'static str {
        match self {
            DestinationType::National => "national",
            DestinationType::Eu => "eu",
            DestinationType::ExtraEu => "extra_eu",
        }
    }

    /// Returns true for destinations where the country code selects the pricing.
    pub fn is_international(&self) -> bool {
        !matches!(self, DestinationType::National)
    }
}

/// The destination of a shipment.
///
/// # Example
///
/// ```
/// use tariff_engine::models::{Destination, DestinationType};
///
/// let destination = Destination::international(DestinationType::Eu, "DE");
/// assert_eq!(destination.to_string(), "eu/DE");
/// assert_eq!(Destination::national().to_string(), "national");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Destination {
    /// The destination class.
    #[serde(rename = "type")]
    pub destination_type: DestinationType,
    /// ISO country code, only meaningful for international destinations.
    #[serde(default)]
    pub country_code: Option<String>,
}

impl Destination {
    /// A domestic destination.
    pub fn national() -> Self {
        Self {
            destination_type: DestinationType::National,
            country_code: None,
        }
    }

    /// An international destination for a specific country.
    pub fn international(destination_type: DestinationType, country_code: &str) -> Self {
        Self {
            destination_type,
            country_code: Some(country_code.to_string()),
        }
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.country_code {
            Some(code) if self.destination_type.is_international() => {
                write!(f, "{}/{}", self.destination_type.as_str(), code)
            }
            _ => f.write_str(self.destination_type.as_str()),
        }
    }
}

/// A shipping service offered by a carrier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Service {
    /// Unique identifier for the service.
    pub id: String,
    /// The owning carrier's id. Filled in by the loader for nested configuration.
    #[serde(default)]
    pub carrier_id: String,
    /// The service code used by discounts and fees to scope themselves.
    pub code: String,
    /// Human-readable service name.
    pub name: String,
    /// The destination classes this service delivers to.
    #[serde(default)]
    pub destination_types: Vec<DestinationType>,
    /// Minimum delivery time in working days.
    #[serde(default)]
    pub min_delivery_days: Option<u32>,
    /// Maximum delivery time in working days.
    #[serde(default)]
    pub max_delivery_days: Option<u32>,
    /// Pricing entries per destination.
    #[serde(default)]
    pub pricing: Vec<Pricing>,
}

/// A shipping carrier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Carrier {
    /// Unique identifier for the carrier.
    pub id: String,
    /// Carrier display name (e.g., "GLS").
    pub name: String,
    /// Carrier-wide fuel surcharge percentage.
    pub fuel_surcharge: Decimal,
    /// Whether weights are volumetric; handled upstream of the engine.
    #[serde(default)]
    pub is_volumetric: bool,
    /// Whether the carrier is currently offered.
    #[serde(default = "default_true")]
    pub is_active: bool,
    /// Services offered by the carrier.
    #[serde(default)]
    pub services: Vec<Service>,
    /// Fixed toll fee replacing any generic toll, resolved at load time.
    #[serde(default, skip_deserializing)]
    pub fixed_toll_fee: Option<Decimal>,
}

fn default_true() -> bool {
    true
}

impl Carrier {
    /// Returns true when a fixed toll fee overrides generic toll fees for this carrier.
    pub fn has_fixed_toll_override(&self) -> bool {
        self.fixed_toll_fee.is_some()
    }

    /// Finds a service by its code.
    pub fn service(&self, code: &str) -> Option<&Service> {
        self.services.iter().find(|s| s.code == code)
    }
}
