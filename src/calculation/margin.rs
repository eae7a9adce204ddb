//! Margin and final price calculation.
//!
//! This module composes the discount stack, fuel surcharge and toll fee into
//! a single [`Rate`]. Each step is recorded in the audit trace.
//!
//! # Discount modes
//!
//! - [`DiscountMode::Margin`]: the operator margin discount reduces the
//!   margin, the fuel surcharge is charged on the discounted retail price,
//!   and the toll is added last.
//! - [`DiscountMode::Price`]: the fuel surcharge is charged on the retail
//!   price, the volume and promotion discounts reduce that post-fuel total,
//!   and the toll is added last. The amount taken off never exceeds the
//!   margin in that total, so the price before toll stays at or above cost.
//!
//! In margin mode a tariff whose retail price is below its purchase price
//! has a negative margin. Discounting a negative margin moves the price
//! *up* toward cost, so such rates carry a `NEGATIVE_BASE_MARGIN` warning.

use rust_decimal::Decimal;

use crate::config::MarginThresholds;
use crate::error::{EngineError, EngineResult};
use crate::models::{
    AuditStep, AuditWarning, Carrier, DiscountMode, FuelBreakdown, MarginPercentage, MarginTier,
    Rate, WeightRange,
};

use super::discount_stack::{
    DISCOUNT_CAPPED, ResolvedDiscounts, apply_margin_discount, apply_price_discount,
    validate_margin_discount,
};
use super::fuel_surcharge::apply_fuel_surcharge;

/// Warning code for a rate whose discounts consumed the whole margin.
pub const NEGATIVE_MARGIN: &str = "NEGATIVE_MARGIN";
/// Warning code for a tariff whose retail price is below its purchase price.
pub const NEGATIVE_BASE_MARGIN: &str = "NEGATIVE_BASE_MARGIN";

/// Classifies a margin percentage into a badge tier.
///
/// Only a [`MarginPercentage`] is accepted; absolute currency margins have
/// no meaning against these thresholds.
///
/// # Examples
///
/// ```
/// use tariff_engine::calculation::margin_tier;
/// use tariff_engine::config::MarginThresholds;
/// use tariff_engine::models::{MarginPercentage, MarginTier};
/// use rust_decimal::Decimal;
///
/// let thresholds = MarginThresholds::default();
/// assert_eq!(margin_tier(MarginPercentage(Decimal::from(25)), &thresholds), MarginTier::High);
/// assert_eq!(margin_tier(MarginPercentage(Decimal::from(15)), &thresholds), MarginTier::Medium);
/// assert_eq!(margin_tier(MarginPercentage(Decimal::from(14)), &thresholds), MarginTier::Low);
/// ```
pub fn margin_tier(percentage: MarginPercentage, thresholds: &MarginThresholds) -> MarginTier {
    if percentage.value() >= thresholds.high {
        MarginTier::High
    } else if percentage.value() >= thresholds.medium {
        MarginTier::Medium
    } else {
        MarginTier::Low
    }
}

/// Expresses `margin` as a percentage of `discounted_price`, rounded to 2 dp.
///
/// # Returns
///
/// Returns `ArithmeticGuard` when `discounted_price` is zero.
pub fn margin_percentage(
    rate_id: &str,
    margin: Decimal,
    discounted_price: Decimal,
) -> EngineResult<MarginPercentage> {
    if discounted_price.is_zero() {
        return Err(EngineError::ArithmeticGuard {
            rate_id: rate_id.to_string(),
            message: "discounted price is zero, margin percentage is undefined".to_string(),
        });
    }
    let pct = margin
        .checked_div(discounted_price)
        .map(|ratio| ratio * Decimal::ONE_HUNDRED)
        .ok_or_else(|| EngineError::ArithmeticGuard {
            rate_id: rate_id.to_string(),
            message: format!("margin {} over {} overflows", margin, discounted_price),
        })?;
    Ok(MarginPercentage(pct.round_dp(2)))
}

/// Projects the margin earned over a month of shipments.
pub fn monthly_margin(final_price: Decimal, purchase_price: Decimal, monthly_volume: u32) -> Decimal {
    (final_price - purchase_price) * Decimal::from(monthly_volume)
}

/// Everything besides the tariff needed to price a weight range.
///
/// One set of inputs prices every weight range of a rate table.
#[derive(Debug, Clone)]
pub struct RateInputs<'a> {
    /// The carrier, with its fuel surcharge and resolved toll capability.
    pub carrier: &'a Carrier,
    /// The service being priced.
    pub service_code: &'a str,
    /// The resolved discount stack.
    pub discounts: ResolvedDiscounts,
    /// Whether the fuel surcharge is part of the price.
    pub include_fuel_surcharge: bool,
    /// Per-shipment toll fee, already resolved by the toll policy.
    pub toll_fee: Decimal,
    /// Whether the toll fee came from a fixed carrier override, in which
    /// case it is also shown in the base price.
    pub fixed_toll_override: bool,
    /// Monthly shipment volume used for the projection.
    pub monthly_volume: u32,
    /// Which discount semantics to use.
    pub mode: DiscountMode,
    /// Badge thresholds.
    pub thresholds: &'a MarginThresholds,
}

/// A computed rate together with its audit steps and warnings.
#[derive(Debug, Clone)]
pub struct ComputedRate {
    /// The priced rate.
    pub rate: Rate,
    /// Audit steps, numbered from the step number passed in.
    pub audit_steps: Vec<AuditStep>,
    /// Warnings raised while pricing.
    pub warnings: Vec<AuditWarning>,
}

/// Intermediate amounts shared by both discount modes.
struct Priced {
    discount_amount: Decimal,
    discounted_price: Decimal,
    fuel: FuelBreakdown,
    final_price: Decimal,
    actual_margin: Decimal,
}

/// Computes the rate for one weight range.
///
/// This function is pure: the same inputs always give the same rate.
///
/// # Returns
///
/// Returns a `ComputedRate`, or:
/// - `InvalidDiscount` if the margin discount is outside `[0, 90]`
/// - `ArithmeticGuard` if the purchase price is not positive, the retail
///   price is negative, or the margin percentage has a zero divisor
///
/// An eroded margin is not an error; it is reported as a `NEGATIVE_MARGIN`
/// warning. A price discount cut back to the available margin is reported
/// as `DISCOUNT_CAPPED`.
pub fn compute_rate(
    inputs: &RateInputs<'_>,
    tariff: &WeightRange,
    step_number: u32,
) -> EngineResult<ComputedRate> {
    let margin_discount = validate_margin_discount(inputs.discounts.margin_discount_pct)?;

    if tariff.purchase_price <= Decimal::ZERO {
        return Err(EngineError::ArithmeticGuard {
            rate_id: tariff.id.clone(),
            message: format!("purchase price {} is not positive", tariff.purchase_price),
        });
    }
    if tariff.retail_price < Decimal::ZERO {
        return Err(EngineError::ArithmeticGuard {
            rate_id: tariff.id.clone(),
            message: format!("retail price {} is negative", tariff.retail_price),
        });
    }

    let mut audit_steps = Vec::new();
    let mut warnings = Vec::new();
    let fuel_pct = inputs.carrier.fuel_surcharge;

    let priced = match inputs.mode {
        DiscountMode::Margin => {
            let discounted = apply_margin_discount(tariff, margin_discount);
            if discounted.base_margin < Decimal::ZERO && margin_discount > Decimal::ZERO {
                warnings.push(AuditWarning::new(
                    NEGATIVE_BASE_MARGIN,
                    format!(
                        "{}: retail {} is below purchase {}; a {}% margin discount raises the price to {}",
                        tariff.id,
                        tariff.retail_price.normalize(),
                        tariff.purchase_price.normalize(),
                        margin_discount.normalize(),
                        discounted.discounted_retail_price.normalize()
                    ),
                    "medium",
                ));
            }
            audit_steps.push(AuditStep {
                step_number,
                rule_id: "margin_discount".to_string(),
                rule_name: "Margin Discount".to_string(),
                input: serde_json::json!({
                    "purchase_price": tariff.purchase_price.normalize().to_string(),
                    "retail_price": tariff.retail_price.normalize().to_string(),
                    "margin_discount_pct": margin_discount.normalize().to_string()
                }),
                output: serde_json::json!({
                    "base_margin": discounted.base_margin.normalize().to_string(),
                    "discount_amount": discounted.discount_amount.normalize().to_string(),
                    "discounted_retail_price": discounted.discounted_retail_price.normalize().to_string()
                }),
                reasoning: format!(
                    "{}% of margin {} given away ({}), customer pays {} + {} = {}",
                    margin_discount.normalize(),
                    discounted.base_margin.normalize(),
                    discounted.discount_amount.normalize(),
                    tariff.purchase_price.normalize(),
                    (discounted.base_margin - discounted.discount_amount).normalize(),
                    discounted.discounted_retail_price.normalize()
                ),
            });

            let fuel = apply_fuel_surcharge(
                discounted.discounted_retail_price,
                tariff.purchase_price,
                fuel_pct,
                inputs.include_fuel_surcharge,
                step_number + 1,
            );
            audit_steps.push(fuel.audit_step);
            let fuel = fuel.fuel;

            let final_price = discounted.discounted_retail_price + fuel.customer_amount + inputs.toll_fee;
            let actual_margin = (discounted.base_margin - discounted.discount_amount)
                + fuel.fuel_margin
                + inputs.toll_fee;

            Priced {
                discount_amount: discounted.discount_amount,
                discounted_price: discounted.discounted_retail_price,
                fuel,
                final_price,
                actual_margin,
            }
        }
        DiscountMode::Price => {
            let fuel = apply_fuel_surcharge(
                tariff.retail_price,
                tariff.purchase_price,
                fuel_pct,
                inputs.include_fuel_surcharge,
                step_number,
            );
            audit_steps.push(fuel.audit_step);
            let fuel = fuel.fuel;

            let total_base = tariff.retail_price + fuel.customer_amount;
            let available_margin = total_base - tariff.purchase_price - fuel.supplier_amount;
            let combined = inputs.discounts.combined_price_discount();
            let discounted = apply_price_discount(total_base, combined, available_margin);
            if discounted.capped {
                warnings.push(AuditWarning::new(
                    DISCOUNT_CAPPED,
                    format!(
                        "{}: {}% off {} would remove {}, capped at margin {}",
                        tariff.id,
                        combined.normalize(),
                        total_base.normalize(),
                        discounted.requested_amount.normalize(),
                        discounted.discount_amount.normalize()
                    ),
                    "medium",
                ));
            }
            audit_steps.push(AuditStep {
                step_number: step_number + 1,
                rule_id: "price_discount".to_string(),
                rule_name: "Price Discount".to_string(),
                input: serde_json::json!({
                    "total_base_price": total_base.normalize().to_string(),
                    "available_margin": available_margin.normalize().to_string(),
                    "volume_discount_pct": inputs.discounts.volume_discount_pct.normalize().to_string(),
                    "promo_discount_pct": inputs.discounts.promo_discount_pct.normalize().to_string()
                }),
                output: serde_json::json!({
                    "requested_amount": discounted.requested_amount.normalize().to_string(),
                    "discount_amount": discounted.discount_amount.normalize().to_string(),
                    "discounted_price": discounted.discounted_price.normalize().to_string(),
                    "capped": discounted.capped
                }),
                reasoning: if discounted.capped {
                    format!(
                        "{}% off total base price {} capped at margin {} = {}",
                        combined.normalize(),
                        total_base.normalize(),
                        discounted.discount_amount.normalize(),
                        discounted.discounted_price.normalize()
                    )
                } else {
                    format!(
                        "{}% off total base price {} = {}",
                        combined.normalize(),
                        total_base.normalize(),
                        discounted.discounted_price.normalize()
                    )
                },
            });

            let final_price = discounted.discounted_price + inputs.toll_fee;
            let actual_margin = final_price - tariff.purchase_price - fuel.supplier_amount;

            Priced {
                discount_amount: discounted.discount_amount,
                discounted_price: discounted.discounted_price,
                fuel,
                final_price,
                actual_margin,
            }
        }
    };

    let margin_pct = margin_percentage(&tariff.id, priced.actual_margin, priced.discounted_price)?;
    let tier = margin_tier(margin_pct, inputs.thresholds);
    let projected = monthly_margin(priced.final_price, tariff.purchase_price, inputs.monthly_volume);

    let base_price = if inputs.fixed_toll_override {
        tariff.retail_price + inputs.toll_fee
    } else {
        tariff.retail_price
    };

    audit_steps.push(AuditStep {
        step_number: step_number + 2,
        rule_id: "final_price".to_string(),
        rule_name: "Final Price".to_string(),
        input: serde_json::json!({
            "discounted_price": priced.discounted_price.normalize().to_string(),
            "customer_fuel": priced.fuel.customer_amount.normalize().to_string(),
            "toll_fee": inputs.toll_fee.normalize().to_string(),
            "monthly_volume": inputs.monthly_volume
        }),
        output: serde_json::json!({
            "final_price": priced.final_price.normalize().to_string(),
            "actual_margin": priced.actual_margin.normalize().to_string(),
            "margin_percentage": margin_pct.value().normalize().to_string(),
            "margin_tier": tier,
            "monthly_margin": projected.normalize().to_string()
        }),
        reasoning: format!(
            "Final price {}, margin {} ({}% of discounted price)",
            priced.final_price.normalize(),
            priced.actual_margin.normalize(),
            margin_pct.value().normalize()
        ),
    });

    let rate = Rate {
        rate_id: tariff.id.clone(),
        carrier_id: inputs.carrier.id.clone(),
        carrier_name: inputs.carrier.name.clone(),
        service_code: inputs.service_code.to_string(),
        weight_min: tariff.min,
        weight_max: tariff.max,
        mode: inputs.mode,
        base_price,
        purchase_price: tariff.purchase_price,
        user_discount: margin_discount,
        volume_discount: inputs.discounts.volume_discount_pct,
        promo_discount: inputs.discounts.promo_discount_pct,
        base_margin: tariff.margin(),
        discount_amount: priced.discount_amount,
        discounted_price: priced.discounted_price,
        fuel: priced.fuel,
        toll_fee: inputs.toll_fee,
        final_price: priced.final_price,
        actual_margin: priced.actual_margin,
        margin_percentage: margin_pct,
        margin_tier: tier,
        monthly_volume: inputs.monthly_volume,
        monthly_margin: projected,
    };

    if rate.is_margin_eroded() {
        warnings.push(AuditWarning::new(
            NEGATIVE_MARGIN,
            format!(
                "{}: margin before toll is {} at final price {}",
                rate.rate_id,
                (rate.actual_margin - rate.toll_fee).normalize(),
                rate.final_price.normalize()
            ),
            "high",
        ));
    }

    Ok(ComputedRate {
        rate,
        audit_steps,
        warnings,
    })
}
