//! Configuration types for the tariff catalogue.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML configuration files, and the assembled
//! [`CatalogueConfig`] the engine prices against.

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::models::{AdditionalFee, AuditWarning, Carrier, Promotion, VolumeDiscount};

use super::validation::validate_catalogue;

/// Carrier name that carries a fixed toll fee by default.
pub const GLS_CARRIER_NAME: &str = "GLS";

/// Returns the fixed toll fee charged on every GLS shipment (0.05).
pub fn gls_fixed_toll_fee() -> Decimal {
    Decimal::new(5, 2)
}

/// Margin percentage thresholds for badge classification.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MarginThresholds {
    /// At or above this percentage the margin is "high".
    pub high: Decimal,
    /// At or above this percentage the margin is "medium".
    pub medium: Decimal,
}

impl Default for MarginThresholds {
    fn default() -> Self {
        Self {
            high: Decimal::from(25),
            medium: Decimal::from(15),
        }
    }
}

/// A carrier whose toll fee is a fixed amount, regardless of fee data.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TollOverride {
    /// Exact, case-sensitive carrier name.
    pub carrier_name: String,
    /// The fixed toll fee.
    pub amount: Decimal,
}

/// Strategy table of carriers with a fixed toll fee override.
///
/// Resolved once per carrier when the catalogue is assembled, so pricing
/// code only ever asks [`Carrier::has_fixed_toll_override`].
///
/// # Example
///
/// ```
/// use tariff_engine::config::TollOverrideTable;
///
/// let table = TollOverrideTable::default();
/// assert!(table.carrier_has_fixed_toll_override("GLS"));
/// assert!(!table.carrier_has_fixed_toll_override("gls"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct TollOverrideTable {
    overrides: Vec<TollOverride>,
}

impl Default for TollOverrideTable {
    fn default() -> Self {
        Self {
            overrides: vec![TollOverride {
                carrier_name: GLS_CARRIER_NAME.to_string(),
                amount: gls_fixed_toll_fee(),
            }],
        }
    }
}

impl TollOverrideTable {
    /// Creates a table from explicit overrides.
    pub fn new(overrides: Vec<TollOverride>) -> Self {
        Self { overrides }
    }

    /// Returns the fixed toll fee for a carrier name, if it has one.
    pub fn fixed_toll_for(&self, carrier_name: &str) -> Option<Decimal> {
        self.overrides
            .iter()
            .find(|o| o.carrier_name == carrier_name)
            .map(|o| o.amount)
    }

    /// Returns true when the named carrier's toll fee is fixed.
    pub fn carrier_has_fixed_toll_override(&self, carrier_name: &str) -> bool {
        self.fixed_toll_for(carrier_name).is_some()
    }
}

/// Engine settings from engine.yaml.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Default)]
pub struct EngineSettings {
    /// Margin badge thresholds.
    #[serde(default)]
    pub margin_thresholds: MarginThresholds,
    /// Fixed toll fee overrides by carrier name.
    #[serde(default)]
    pub toll_overrides: TollOverrideTable,
}

/// Carriers configuration file structure.
#[derive(Debug, Clone, Deserialize)]
pub struct CarriersConfig {
    /// All carriers with their nested services and pricing.
    pub carriers: Vec<Carrier>,
}

/// Discounts configuration file structure.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct DiscountsConfig {
    /// Volume discount bands.
    #[serde(default)]
    pub volume_discounts: Vec<VolumeDiscount>,
    /// Promotional campaigns.
    #[serde(default)]
    pub promotions: Vec<Promotion>,
    /// Fixed additional fees.
    #[serde(default)]
    pub additional_fees: Vec<AdditionalFee>,
}

/// The complete catalogue loaded from YAML files.
///
/// Assembly normalises the data once: service back-references are filled
/// in, weight ranges are ordered by `min`, toll overrides are resolved onto
/// carriers, and overlaps are reported as data warnings.
#[derive(Debug, Clone)]
pub struct CatalogueConfig {
    settings: EngineSettings,
    carriers: Vec<Carrier>,
    discounts: DiscountsConfig,
    data_warnings: Vec<AuditWarning>,
}

impl CatalogueConfig {
    /// Creates a new CatalogueConfig from its component parts.
    pub fn new(
        settings: EngineSettings,
        carriers: Vec<Carrier>,
        discounts: DiscountsConfig,
    ) -> Self {
        let mut carriers = carriers;
        for carrier in &mut carriers {
            carrier.fixed_toll_fee = settings.toll_overrides.fixed_toll_for(&carrier.name);
            for service in &mut carrier.services {
                service.carrier_id = carrier.id.clone();
                for pricing in &mut service.pricing {
                    pricing.weight_ranges.sort_by(|a, b| a.min.cmp(&b.min));
                }
            }
        }

        let data_warnings = validate_catalogue(&carriers, &discounts.volume_discounts);

        Self {
            settings,
            carriers,
            discounts,
            data_warnings,
        }
    }

    /// Returns the engine settings.
    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// Returns all carriers.
    pub fn carriers(&self) -> &[Carrier] {
        &self.carriers
    }

    /// Returns all volume discount bands.
    pub fn volume_discounts(&self) -> &[VolumeDiscount] {
        &self.discounts.volume_discounts
    }

    /// Returns all promotions.
    pub fn promotions(&self) -> &[Promotion] {
        &self.discounts.promotions
    }

    /// Returns all additional fees.
    pub fn additional_fees(&self) -> &[AdditionalFee] {
        &self.discounts.additional_fees
    }

    /// Returns the data-consistency warnings found when the catalogue was assembled.
    pub fn data_warnings(&self) -> &[AuditWarning] {
        &self.data_warnings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DestinationType, Pricing, Service, WeightRange};
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn carrier(id: &str, name: &str) -> Carrier {
        Carrier {
            id: id.to_string(),
            name: name.to_string(),
            fuel_surcharge: dec("10"),
            is_volumetric: false,
            is_active: true,
            services: vec![Service {
                id: format!("{}_std", id),
                carrier_id: String::new(),
                code: "STD".to_string(),
                name: "Standard".to_string(),
                destination_types: vec![DestinationType::National],
                min_delivery_days: Some(1),
                max_delivery_days: Some(3),
                pricing: vec![Pricing {
                    destination_type: DestinationType::National,
                    country_code: None,
                    weight_ranges: vec![
                        WeightRange {
                            id: "wr_b".to_string(),
                            min: dec("1.01"),
                            max: dec("3"),
                            purchase_price: dec("6"),
                            retail_price: dec("9"),
                        },
                        WeightRange {
                            id: "wr_a".to_string(),
                            min: dec("0"),
                            max: dec("1"),
                            purchase_price: dec("5.5"),
                            retail_price: dec("7.9"),
                        },
                    ],
                }],
            }],
            fixed_toll_fee: None,
        }
    }

    #[test]
    fn test_default_toll_table_contains_gls() {
        let table = TollOverrideTable::default();
        assert_eq!(table.fixed_toll_for("GLS"), Some(dec("0.05")));
        assert_eq!(table.fixed_toll_for("BRT"), None);
    }

    #[test]
    fn test_toll_override_is_case_sensitive() {
        let table = TollOverrideTable::default();
        assert!(!table.carrier_has_fixed_toll_override("Gls"));
        assert!(!table.carrier_has_fixed_toll_override("GLS "));
    }

    #[test]
    fn test_default_thresholds_are_25_and_15() {
        let thresholds = MarginThresholds::default();
        assert_eq!(thresholds.high, dec("25"));
        assert_eq!(thresholds.medium, dec("15"));
    }

    #[test]
    fn test_settings_deserialize_with_custom_overrides() {
        let yaml = r#"
margin_thresholds:
  high: 30
  medium: 10
toll_overrides:
  - carrier_name: SDA
    amount: 0.10
"#;
        let settings: EngineSettings = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(settings.margin_thresholds.high, dec("30"));
        assert!(settings.toll_overrides.carrier_has_fixed_toll_override("SDA"));
        assert!(!settings.toll_overrides.carrier_has_fixed_toll_override("GLS"));
    }

    #[test]
    fn test_catalogue_resolves_toll_override_per_carrier() {
        let catalogue = CatalogueConfig::new(
            EngineSettings::default(),
            vec![carrier("gls", "GLS"), carrier("brt", "BRT")],
            DiscountsConfig::default(),
        );

        assert_eq!(catalogue.carriers()[0].fixed_toll_fee, Some(dec("0.05")));
        assert!(!catalogue.carriers()[1].has_fixed_toll_override());
    }

    #[test]
    fn test_catalogue_fills_service_carrier_and_sorts_ranges() {
        let catalogue = CatalogueConfig::new(
            EngineSettings::default(),
            vec![carrier("brt", "BRT")],
            DiscountsConfig::default(),
        );

        let service = &catalogue.carriers()[0].services[0];
        assert_eq!(service.carrier_id, "brt");
        let ids: Vec<&str> = service.pricing[0]
            .weight_ranges
            .iter()
            .map(|r| r.id.as_str())
            .collect();
        assert_eq!(ids, vec!["wr_a", "wr_b"]);
        assert!(catalogue.data_warnings().is_empty());
    }
}
