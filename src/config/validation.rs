//! Load-time validation of catalogue data.
//!
//! Overlapping weight ranges and volume bands make lookups ambiguous. The
//! engine still resolves them with a defined tie-break at query time, but
//! they are reported here, once, when the catalogue is loaded.

use rust_decimal::Decimal;
use tracing::warn;

use crate::models::{AuditWarning, Carrier, VolumeDiscount};

/// Warning code for weight ranges that share a weight within one pricing.
pub const OVERLAPPING_WEIGHT_RANGES: &str = "OVERLAPPING_WEIGHT_RANGES";
/// Warning code for volume bands that share a volume for one service.
pub const OVERLAPPING_VOLUME_BANDS: &str = "OVERLAPPING_VOLUME_BANDS";
/// Warning code for a weight range whose `min` exceeds its `max`.
pub const INVERTED_WEIGHT_RANGE: &str = "INVERTED_WEIGHT_RANGE";
/// Warning code for a tariff whose purchase price cannot be priced against.
pub const NON_POSITIVE_PURCHASE_PRICE: &str = "NON_POSITIVE_PURCHASE_PRICE";

/// Validates carriers and volume discounts, returning every consistency problem found.
pub fn validate_catalogue(
    carriers: &[Carrier],
    volume_discounts: &[VolumeDiscount],
) -> Vec<AuditWarning> {
    let mut warnings = Vec::new();

    for carrier in carriers {
        for service in &carrier.services {
            for pricing in &service.pricing {
                let scope = format!(
                    "{}/{} ({}{})",
                    carrier.id,
                    service.code,
                    pricing.destination_type.as_str(),
                    pricing
                        .country_code
                        .as_deref()
                        .map(|c| format!("/{}", c))
                        .unwrap_or_default()
                );

                for range in &pricing.weight_ranges {
                    if range.min > range.max {
                        warnings.push(AuditWarning::new(
                            INVERTED_WEIGHT_RANGE,
                            format!(
                                "{}: weight range '{}' has min {} above max {}",
                                scope, range.id, range.min, range.max
                            ),
                            "high",
                        ));
                    }
                    if range.purchase_price <= Decimal::ZERO {
                        warnings.push(AuditWarning::new(
                            NON_POSITIVE_PURCHASE_PRICE,
                            format!(
                                "{}: weight range '{}' has purchase price {}",
                                scope, range.id, range.purchase_price
                            ),
                            "high",
                        ));
                    }
                }

                for (i, a) in pricing.weight_ranges.iter().enumerate() {
                    for b in &pricing.weight_ranges[i + 1..] {
                        if a.overlaps(b) {
                            warnings.push(AuditWarning::new(
                                OVERLAPPING_WEIGHT_RANGES,
                                format!(
                                    "{}: weight ranges '{}' [{}, {}] and '{}' [{}, {}] overlap",
                                    scope, a.id, a.min, a.max, b.id, b.min, b.max
                                ),
                                "medium",
                            ));
                        }
                    }
                }
            }
        }
    }

    for (i, a) in volume_discounts.iter().enumerate() {
        for b in &volume_discounts[i + 1..] {
            let shared: Vec<&str> = a
                .applicable_services
                .iter()
                .filter(|code| b.applies_to(code))
                .map(String::as_str)
                .collect();
            if !shared.is_empty() && a.overlaps(b) {
                warnings.push(AuditWarning::new(
                    OVERLAPPING_VOLUME_BANDS,
                    format!(
                        "volume bands '{}' and '{}' overlap for services [{}]",
                        a.id,
                        b.id,
                        shared.join(", ")
                    ),
                    "medium",
                ));
            }
        }
    }

    for warning in &warnings {
        warn!(code = %warning.code, "{}", warning.message);
    }

    warnings
}
