//! Tariff lookup functionality.
//!
//! This module selects the destination pricing of a service and the weight
//! range that covers a shipment.

use rust_decimal::Decimal;

use crate::error::{EngineError, EngineResult};
use crate::models::{AuditStep, Destination, Pricing, Service, WeightRange};

/// The result of a tariff lookup, including the tariff and audit step.
#[derive(Debug, Clone)]
pub struct TariffLookupResult {
    /// The weight range covering the shipment.
    pub tariff: WeightRange,
    /// The audit step recording this lookup.
    pub audit_step: AuditStep,
}

/// Selects the pricing entry of `service` for `destination`.
///
/// For international destinations an entry for the destination's country
/// takes precedence over the wildcard entry (`country_code = None`), which is
/// the fallback. For national destinations the country code is ignored and
/// the wildcard entry is preferred over any country-tagged one.
pub fn select_pricing<'a>(service: &'a Service, destination: &Destination) -> Option<&'a Pricing> {
    let candidates: Vec<&Pricing> = service
        .pricing
        .iter()
        .filter(|p| p.destination_type == destination.destination_type)
        .collect();
    let wildcard = candidates.iter().find(|p| p.is_wildcard()).copied();

    if destination.destination_type.is_international() {
        destination
            .country_code
            .as_deref()
            .and_then(|code| {
                candidates
                    .iter()
                    .find(|p| p.country_code.as_deref() == Some(code))
                    .copied()
            })
            .or(wildcard)
    } else {
        wildcard.or_else(|| candidates.first().copied())
    }
}

/// Finds the tariff that applies to a shipment.
///
/// The weight range whose closed interval `[min, max]` contains `weight_kg`
/// is returned. Ranges are scanned in ascending `min` order, so if the data
/// contains overlapping ranges the lowest one wins.
///
/// # Returns
///
/// Returns a `TariffLookupResult`, or:
/// - `PricingNotFound` if the service has no pricing for the destination
/// - `TariffNotFound` if no range covers the weight; the nearest range is
///   never substituted
///
/// # Examples
///
/// ```
/// use tariff_engine::calculation::find_tariff;
/// use tariff_engine::models::{Destination, DestinationType, Pricing, Service, WeightRange};
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let service = Service {
///     id: "svc".to_string(),
///     carrier_id: "gls".to_string(),
///     code: "BUSINESS".to_string(),
///     name: "Business".to_string(),
///     destination_types: vec![DestinationType::National],
///     min_delivery_days: None,
///     max_delivery_days: None,
///     pricing: vec![Pricing {
///         destination_type: DestinationType::National,
///         country_code: None,
///         weight_ranges: vec![WeightRange {
///             id: "wr_0_1".to_string(),
///             min: Decimal::ZERO,
///             max: Decimal::ONE,
///             purchase_price: Decimal::from_str("5.5").unwrap(),
///             retail_price: Decimal::from_str("7.9").unwrap(),
///         }],
///     }],
/// };
///
/// let result = find_tariff(&service, Decimal::from_str("0.4").unwrap(), &Destination::national(), 1).unwrap();
/// assert_eq!(result.tariff.id, "wr_0_1");
/// assert!(find_tariff(&service, Decimal::from(2), &Destination::national(), 1).is_err());
/// ```
pub fn find_tariff(
    service: &Service,
    weight_kg: Decimal,
    destination: &Destination,
    step_number: u32,
) -> EngineResult<TariffLookupResult> {
    let pricing =
        select_pricing(service, destination).ok_or_else(|| EngineError::PricingNotFound {
            service_code: service.code.clone(),
            destination: destination.to_string(),
        })?;

    let not_found = || EngineError::TariffNotFound {
        service_code: service.code.clone(),
        weight_kg,
        destination: destination.to_string(),
    };

    if weight_kg < Decimal::ZERO {
        return Err(not_found());
    }

    let tariff = pricing
        .weight_ranges
        .iter()
        .find(|r| r.contains(weight_kg))
        .ok_or_else(not_found)?;

    let pricing_scope = match &pricing.country_code {
        Some(code) => format!("{} pricing for {}", pricing.destination_type.as_str(), code),
        None => format!("{} pricing for all countries", pricing.destination_type.as_str()),
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "tariff_lookup".to_string(),
        rule_name: "Tariff Lookup".to_string(),
        input: serde_json::json!({
            "service_code": service.code,
            "weight_kg": weight_kg.normalize().to_string(),
            "destination": destination.to_string()
        }),
        output: serde_json::json!({
            "rate_id": tariff.id,
            "min": tariff.min.normalize().to_string(),
            "max": tariff.max.normalize().to_string(),
            "purchase_price": tariff.purchase_price.normalize().to_string(),
            "retail_price": tariff.retail_price.normalize().to_string(),
            "country_specific": !pricing.is_wildcard()
        }),
        reasoning: format!(
            "{} kg falls in [{}, {}] of {}",
            weight_kg.normalize(),
            tariff.min.normalize(),
            tariff.max.normalize(),
            pricing_scope
        ),
    };

    Ok(TariffLookupResult {
        tariff: tariff.clone(),
        audit_step,
    })
}
