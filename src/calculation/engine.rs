//! End-to-end pricing against a loaded catalogue.
//!
//! These functions resolve carrier, service, tariff, discounts and toll from
//! a [`ConfigLoader`] and run the pure calculators in order, collecting the
//! audit trace.

use std::time::Instant;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::config::ConfigLoader;
use crate::error::{EngineError, EngineResult};
use crate::models::{
    AuditTrace, AuditWarning, Carrier, Destination, DiscountMode, RateResult, RateTable,
};

use super::discount_stack::{DiscountResolution, resolve_discounts};
use super::margin::{RateInputs, compute_rate};
use super::rate_table::{DiscountOverrides, compute_rate_table};
use super::tariff_lookup::{find_tariff, select_pricing};
use super::toll_policy::{TollResolution, resolve_toll_fee};

/// Warning code for pricing a carrier that is flagged inactive.
pub const INACTIVE_CARRIER: &str = "INACTIVE_CARRIER";

/// A request to price one shipment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateQuery {
    /// The carrier id.
    pub carrier_id: String,
    /// The service code.
    pub service_code: String,
    /// Shipment weight in kg.
    pub weight_kg: Decimal,
    /// Where the shipment goes.
    pub destination: Destination,
    /// Operator margin discount percentage.
    pub margin_discount: Decimal,
    /// Whether the fuel surcharge is part of the price.
    pub include_fuel_surcharge: bool,
    /// Monthly shipment volume.
    pub monthly_volume: u32,
    /// Which discount semantics to use.
    pub mode: DiscountMode,
}

/// A request to price every weight range of a service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableQuery {
    /// The carrier id.
    pub carrier_id: String,
    /// The service code.
    pub service_code: String,
    /// Where the shipments go.
    pub destination: Destination,
    /// Default operator margin discount percentage.
    pub margin_discount: Decimal,
    /// Per-row margin discount overrides.
    pub overrides: DiscountOverrides,
    /// Whether the fuel surcharge is part of the price.
    pub include_fuel_surcharge: bool,
    /// Monthly shipment volume.
    pub monthly_volume: u32,
    /// Which discount semantics to use.
    pub mode: DiscountMode,
}

/// Discount and toll inputs shared by single rates and tables.
struct SharedInputs {
    discounts: DiscountResolution,
    toll: TollResolution,
    warnings: Vec<AuditWarning>,
}

fn resolve_shared(
    loader: &ConfigLoader,
    carrier: &Carrier,
    service_code: &str,
    margin_discount: Decimal,
    monthly_volume: u32,
    now: DateTime<Utc>,
    step_number: u32,
) -> SharedInputs {
    let catalogue = loader.config();

    let discounts = resolve_discounts(
        service_code,
        margin_discount,
        monthly_volume,
        now,
        catalogue.volume_discounts(),
        catalogue.promotions(),
        step_number,
    );
    let toll = resolve_toll_fee(
        carrier,
        service_code,
        catalogue.additional_fees(),
        step_number + 1,
    );

    let mut warnings = Vec::new();
    if !carrier.is_active {
        warnings.push(AuditWarning::new(
            INACTIVE_CARRIER,
            format!("Carrier '{}' is marked inactive", carrier.id),
            "low",
        ));
    }
    warnings.extend(discounts.warnings.iter().cloned());

    SharedInputs {
        discounts,
        toll,
        warnings,
    }
}

/// Prices one shipment.
///
/// `now` is the instant promotions are evaluated at.
///
/// # Returns
///
/// Returns a `RateResult` with the full audit trace, or the first error
/// encountered: `CarrierNotFound`, `ServiceNotFound`, `PricingNotFound`,
/// `TariffNotFound`, `InvalidDiscount` or `ArithmeticGuard`.
pub fn calculate_rate(
    loader: &ConfigLoader,
    query: &RateQuery,
    now: DateTime<Utc>,
) -> EngineResult<RateResult> {
    let start_time = Instant::now();
    let (carrier, service) = loader.get_service(&query.carrier_id, &query.service_code)?;

    let lookup = find_tariff(service, query.weight_kg, &query.destination, 1)?;
    let shared = resolve_shared(
        loader,
        carrier,
        &service.code,
        query.margin_discount,
        query.monthly_volume,
        now,
        2,
    );

    let inputs = RateInputs {
        carrier,
        service_code: &service.code,
        discounts: shared.discounts.discounts,
        include_fuel_surcharge: query.include_fuel_surcharge,
        toll_fee: shared.toll.amount,
        fixed_toll_override: shared.toll.fixed_override,
        monthly_volume: query.monthly_volume,
        mode: query.mode,
        thresholds: &loader.config().settings().margin_thresholds,
    };
    let computed = compute_rate(&inputs, &lookup.tariff, 4)?;

    let mut steps = vec![
        lookup.audit_step,
        shared.discounts.audit_step,
        shared.toll.audit_step,
    ];
    steps.extend(computed.audit_steps);

    let mut warnings = shared.warnings;
    warnings.extend(computed.warnings);

    let duration_us = start_time.elapsed().as_micros() as u64;
    debug!(
        rate_id = %computed.rate.rate_id,
        final_price = %computed.rate.final_price,
        duration_us,
        "Rate computed"
    );

    Ok(RateResult {
        calculation_id: Uuid::new_v4(),
        timestamp: Utc::now(),
        engine_version: env!("CARGO_PKG_VERSION").to_string(),
        weight_kg: query.weight_kg,
        destination: query.destination.clone(),
        rate: computed.rate,
        audit_trace: AuditTrace {
            steps,
            warnings,
            duration_us,
        },
    })
}

/// Prices every weight range of a service for a destination.
///
/// Lookup failures (`CarrierNotFound`, `ServiceNotFound`, `PricingNotFound`)
/// fail the whole table. Everything else, including an out-of-range margin
/// discount whether it is the default or an override, is reported on the
/// row it affects.
pub fn calculate_rate_table(
    loader: &ConfigLoader,
    query: &TableQuery,
    now: DateTime<Utc>,
) -> EngineResult<RateTable> {
    let (carrier, service) = loader.get_service(&query.carrier_id, &query.service_code)?;

    let pricing =
        select_pricing(service, &query.destination).ok_or_else(|| EngineError::PricingNotFound {
            service_code: service.code.clone(),
            destination: query.destination.to_string(),
        })?;

    let shared = resolve_shared(
        loader,
        carrier,
        &service.code,
        query.margin_discount,
        query.monthly_volume,
        now,
        1,
    );

    let inputs = RateInputs {
        carrier,
        service_code: &service.code,
        discounts: shared.discounts.discounts,
        include_fuel_surcharge: query.include_fuel_surcharge,
        toll_fee: shared.toll.amount,
        fixed_toll_override: shared.toll.fixed_override,
        monthly_volume: query.monthly_volume,
        mode: query.mode,
        thresholds: &loader.config().settings().margin_thresholds,
    };
    let table = compute_rate_table(&inputs, &pricing.weight_ranges, &query.overrides);

    let mut warnings = shared.warnings;
    warnings.extend(table.warnings);

    debug!(
        carrier_id = %carrier.id,
        service_code = %service.code,
        rows = table.rows.len(),
        "Rate table computed"
    );

    Ok(RateTable {
        calculation_id: Uuid::new_v4(),
        timestamp: Utc::now(),
        carrier_id: carrier.id.clone(),
        service_code: service.code.clone(),
        destination: query.destination.clone(),
        mode: query.mode,
        rows: table.rows,
        warnings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DestinationType;
    use chrono::TimeZone;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn loader() -> ConfigLoader {
        ConfigLoader::load("./config/default").unwrap()
    }

    fn april_2026() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 4, 15, 9, 0, 0).unwrap()
    }

    fn rate_query(carrier_id: &str, service_code: &str, weight: &str) -> RateQuery {
        RateQuery {
            carrier_id: carrier_id.to_string(),
            service_code: service_code.to_string(),
            weight_kg: dec(weight),
            destination: Destination::national(),
            margin_discount: dec("20"),
            include_fuel_surcharge: true,
            monthly_volume: 0,
            mode: DiscountMode::Margin,
        }
    }

    /// EN-001: GLS national rate with fuel excluded
    #[test]
    fn test_gls_rate_fuel_excluded() {
        let mut query = rate_query("gls", "BUSINESS", "0.5");
        query.include_fuel_surcharge = false;

        let result = calculate_rate(&loader(), &query, april_2026()).unwrap();

        assert_eq!(result.rate.rate_id, "gls_nat_0_1");
        assert_eq!(result.rate.final_price, dec("7.47"));
        assert_eq!(result.rate.base_price, dec("7.95"));
        assert_eq!(result.engine_version, env!("CARGO_PKG_VERSION"));
    }

    /// EN-002: BRT uses the generic toll fee from fee data
    #[test]
    fn test_brt_rate_uses_additional_fee_toll() {
        let query = rate_query("brt", "EXPRESS", "1");

        let result = calculate_rate(&loader(), &query, april_2026()).unwrap();

        // 4 + 2 * 0.8 = 5.6, fuel 8.5% = 0.476, toll 0.25
        assert_eq!(result.rate.discounted_price, dec("5.6"));
        assert_eq!(result.rate.toll_fee, dec("0.25"));
        assert_eq!(result.rate.final_price, dec("6.326"));
        assert_eq!(result.rate.base_price, dec("6"));
        assert_eq!(result.rate.promo_discount, dec("2"));
    }

    /// EN-003: audit trace records every step in order
    #[test]
    fn test_audit_trace_order() {
        let result =
            calculate_rate(&loader(), &rate_query("gls", "BUSINESS", "2"), april_2026()).unwrap();

        let rule_ids: Vec<&str> = result
            .audit_trace
            .steps
            .iter()
            .map(|s| s.rule_id.as_str())
            .collect();
        assert_eq!(
            rule_ids,
            vec![
                "tariff_lookup",
                "discount_stack",
                "toll_policy",
                "margin_discount",
                "fuel_surcharge",
                "final_price"
            ]
        );
        let numbers: Vec<u32> = result.audit_trace.steps.iter().map(|s| s.step_number).collect();
        assert_eq!(numbers, vec![1, 2, 3, 4, 5, 6]);
    }

    /// EN-004: weight beyond the catalogue is not found
    #[test]
    fn test_weight_beyond_catalogue_not_found() {
        let result = calculate_rate(&loader(), &rate_query("gls", "BUSINESS", "12"), april_2026());
        assert!(matches!(result, Err(EngineError::TariffNotFound { .. })));
    }

    #[test]
    fn test_unknown_carrier_and_service() {
        let result = calculate_rate(&loader(), &rate_query("ups", "BUSINESS", "1"), april_2026());
        assert!(matches!(result, Err(EngineError::CarrierNotFound { .. })));

        let result = calculate_rate(&loader(), &rate_query("gls", "EXPRESS", "1"), april_2026());
        assert!(matches!(result, Err(EngineError::ServiceNotFound { .. })));
    }

    #[test]
    fn test_invalid_margin_discount_rejected() {
        let mut query = rate_query("gls", "BUSINESS", "1");
        query.margin_discount = dec("90.5");

        let result = calculate_rate(&loader(), &query, april_2026());
        assert!(matches!(result, Err(EngineError::InvalidDiscount { .. })));
    }

    #[test]
    fn test_country_specific_international_rate() {
        let mut query = rate_query("gls", "BUSINESS", "0.5");
        query.destination = Destination::international(DestinationType::Eu, "DE");

        let result = calculate_rate(&loader(), &query, april_2026()).unwrap();
        assert_eq!(result.rate.rate_id, "gls_de_0_1");
    }

    /// EN-005: rate table expands every national GLS weight range
    #[test]
    fn test_rate_table_expands_all_ranges() {
        let mut overrides = DiscountOverrides::new();
        overrides.set("gls_nat_1_3", dec("95"));
        let query = TableQuery {
            carrier_id: "gls".to_string(),
            service_code: "BUSINESS".to_string(),
            destination: Destination::national(),
            margin_discount: dec("20"),
            overrides,
            include_fuel_surcharge: true,
            monthly_volume: 250,
            mode: DiscountMode::Price,
        };

        let table = calculate_rate_table(&loader(), &query, april_2026()).unwrap();

        assert_eq!(table.rows.len(), 3);
        assert!(table.rows[0].is_available());
        assert_eq!(table.rows[1].error.as_ref().unwrap().code, "INVALID_DISCOUNT");
        assert!(table.rows[2].is_available());

        let rate = table.rows[0].rate.as_ref().unwrap();
        assert_eq!(rate.volume_discount, dec("6"));
        assert_eq!(rate.promo_discount, dec("4"));
        assert_eq!(rate.mode, DiscountMode::Price);
    }

    /// EN-006: an invalid default discount fails only the rows without a valid override
    #[test]
    fn test_rate_table_invalid_default_discount_fails_rows_not_table() {
        let mut overrides = DiscountOverrides::new();
        overrides.set("gls_nat_1_3", dec("20"));
        let query = TableQuery {
            carrier_id: "gls".to_string(),
            service_code: "BUSINESS".to_string(),
            destination: Destination::national(),
            margin_discount: dec("95"),
            overrides,
            include_fuel_surcharge: false,
            monthly_volume: 0,
            mode: DiscountMode::Margin,
        };

        let table = calculate_rate_table(&loader(), &query, april_2026()).unwrap();

        assert_eq!(table.rows.len(), 3);
        assert_eq!(table.rows[0].error.as_ref().unwrap().code, "INVALID_DISCOUNT");
        assert_eq!(table.rows[2].error.as_ref().unwrap().code, "INVALID_DISCOUNT");
        let rate = table.rows[1].rate.as_ref().unwrap();
        assert_eq!(rate.user_discount, dec("20"));
        // 6.2 + 2.7 * 0.8 + 0.05
        assert_eq!(rate.final_price, dec("8.41"));
    }

    #[test]
    fn test_rate_table_missing_pricing() {
        let query = TableQuery {
            carrier_id: "brt".to_string(),
            service_code: "EXPRESS".to_string(),
            destination: Destination::international(DestinationType::ExtraEu, "US"),
            margin_discount: dec("0"),
            overrides: DiscountOverrides::new(),
            include_fuel_surcharge: true,
            monthly_volume: 0,
            mode: DiscountMode::Margin,
        };

        let result = calculate_rate_table(&loader(), &query, april_2026());
        assert!(matches!(result, Err(EngineError::PricingNotFound { .. })));
    }
}
