//! Discount stack resolution.
//!
//! Three independent discount sources exist:
//! - the operator's margin discount, a percentage of the margin given away;
//! - a volume discount, matched from the monthly shipment count;
//! - a promotional discount, summed over active campaigns.
//!
//! The margin discount and the volume/promotion discounts have different
//! semantics and are applied by different operations,
//! [`apply_margin_discount`] and [`apply_price_discount`]. They are never
//! merged into a single percentage.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::config::OVERLAPPING_VOLUME_BANDS;
use crate::error::{EngineError, EngineResult};
use crate::models::{AuditStep, AuditWarning, Promotion, VolumeDiscount, WeightRange};

/// Warning code for more than one promotion active for a service.
pub const MULTIPLE_PROMOTIONS: &str = "MULTIPLE_PROMOTIONS";
/// Warning code for a price discount cut back to the available margin.
pub const DISCOUNT_CAPPED: &str = "DISCOUNT_CAPPED";

/// Returns the largest margin discount an operator may enter (90%).
pub fn max_margin_discount() -> Decimal {
    Decimal::from(90)
}

fn hundred() -> Decimal {
    Decimal::ONE_HUNDRED
}

/// Validates an operator-entered margin discount.
///
/// Values outside `[0, 90]` are rejected rather than clamped, so that an
/// operator typo is never silently turned into a different price.
///
/// # Examples
///
/// ```
/// use tariff_engine::calculation::validate_margin_discount;
/// use rust_decimal::Decimal;
///
/// assert!(validate_margin_discount(Decimal::from(90)).is_ok());
/// assert!(validate_margin_discount(Decimal::from(91)).is_err());
/// assert!(validate_margin_discount(Decimal::from(-1)).is_err());
/// ```
pub fn validate_margin_discount(value: Decimal) -> EngineResult<Decimal> {
    if value < Decimal::ZERO || value > max_margin_discount() {
        return Err(EngineError::InvalidDiscount {
            value,
            max: max_margin_discount(),
        });
    }
    Ok(value)
}

/// The resolved discount percentages for one service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedDiscounts {
    /// Operator margin discount, validated to `[0, 90]`.
    pub margin_discount_pct: Decimal,
    /// Matched volume discount, clamped to `[0, 100]`.
    pub volume_discount_pct: Decimal,
    /// Summed promotion discount, never negative.
    pub promo_discount_pct: Decimal,
}

impl ResolvedDiscounts {
    /// Returns the volume and promotion discounts stacked additively.
    pub fn combined_price_discount(&self) -> Decimal {
        self.volume_discount_pct + self.promo_discount_pct
    }

    /// Returns a copy with a different operator margin discount.
    pub fn with_margin_discount(&self, margin_discount_pct: Decimal) -> Self {
        Self {
            margin_discount_pct,
            ..*self
        }
    }
}

/// The result of resolving the discount stack, including warnings and the audit step.
#[derive(Debug, Clone)]
pub struct DiscountResolution {
    /// The resolved percentages.
    pub discounts: ResolvedDiscounts,
    /// Data-consistency warnings raised while matching.
    pub warnings: Vec<AuditWarning>,
    /// The audit step recording this resolution.
    pub audit_step: AuditStep,
}

/// Matches the volume discount band for a service and monthly volume.
///
/// If several bands match, which only happens with overlapping data, the
/// highest percentage wins and a warning is returned. No match means 0%.
pub fn resolve_volume_discount(
    bands: &[VolumeDiscount],
    service_code: &str,
    monthly_volume: u32,
) -> (Decimal, Option<AuditWarning>) {
    let matching: Vec<&VolumeDiscount> = bands
        .iter()
        .filter(|b| b.applies_to(service_code) && b.contains(monthly_volume))
        .collect();

    let best = matching
        .iter()
        .map(|b| b.discount_percentage)
        .max()
        .unwrap_or(Decimal::ZERO);

    let warning = (matching.len() > 1).then(|| {
        let ids: Vec<&str> = matching.iter().map(|b| b.id.as_str()).collect();
        AuditWarning::new(
            OVERLAPPING_VOLUME_BANDS,
            format!(
                "{} volume bands match {} shipments for '{}' ({}); using highest {}%",
                matching.len(),
                monthly_volume,
                service_code,
                ids.join(", "),
                best.normalize()
            ),
            "medium",
        )
    });

    (best.clamp(Decimal::ZERO, hundred()), warning)
}

/// Sums the promotions active for a service at `now`.
///
/// Several simultaneously active promotions stack additively and raise a
/// warning.
pub fn resolve_promotion_discount(
    promotions: &[Promotion],
    service_code: &str,
    now: DateTime<Utc>,
) -> (Decimal, Option<AuditWarning>) {
    let active: Vec<&Promotion> = promotions
        .iter()
        .filter(|p| p.applies_to(service_code) && p.is_active_at(now))
        .collect();

    let total: Decimal = active.iter().map(|p| p.discount_percentage).sum();

    let warning = (active.len() > 1).then(|| {
        let ids: Vec<&str> = active.iter().map(|p| p.id.as_str()).collect();
        AuditWarning::new(
            MULTIPLE_PROMOTIONS,
            format!(
                "{} promotions active for '{}' ({}); summed to {}%",
                active.len(),
                service_code,
                ids.join(", "),
                total.normalize()
            ),
            "low",
        )
    });

    (total.max(Decimal::ZERO), warning)
}

/// Resolves the complete discount stack for a service.
///
/// The operator margin discount is passed through as given. It is validated
/// per weight range by [`compute_rate`](super::compute_rate), so a rate
/// table with per-row overrides is not rejected as a whole. Volume and
/// promotion discounts are stacked here and limited to the available margin
/// when they are applied.
///
/// # Examples
///
/// ```
/// use tariff_engine::calculation::resolve_discounts;
/// use chrono::Utc;
/// use rust_decimal::Decimal;
///
/// let resolution = resolve_discounts("EXPRESS", Decimal::from(20), 0, Utc::now(), &[], &[], 1);
/// assert_eq!(resolution.discounts.margin_discount_pct, Decimal::from(20));
/// assert_eq!(resolution.discounts.volume_discount_pct, Decimal::ZERO);
/// ```
pub fn resolve_discounts(
    service_code: &str,
    margin_discount: Decimal,
    monthly_volume: u32,
    now: DateTime<Utc>,
    volume_discounts: &[VolumeDiscount],
    promotions: &[Promotion],
    step_number: u32,
) -> DiscountResolution {
    let margin_discount_pct = margin_discount;
    let mut warnings = Vec::new();

    let (volume_discount_pct, volume_warning) =
        resolve_volume_discount(volume_discounts, service_code, monthly_volume);
    warnings.extend(volume_warning);

    let (promo_discount_pct, promo_warning) =
        resolve_promotion_discount(promotions, service_code, now);
    warnings.extend(promo_warning);

    let discounts = ResolvedDiscounts {
        margin_discount_pct,
        volume_discount_pct,
        promo_discount_pct,
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "discount_stack".to_string(),
        rule_name: "Discount Stack Resolution".to_string(),
        input: serde_json::json!({
            "service_code": service_code,
            "margin_discount": margin_discount.normalize().to_string(),
            "monthly_volume": monthly_volume,
            "now": now.to_rfc3339()
        }),
        output: serde_json::json!({
            "margin_discount_pct": margin_discount_pct.normalize().to_string(),
            "volume_discount_pct": volume_discount_pct.normalize().to_string(),
            "promo_discount_pct": promo_discount_pct.normalize().to_string(),
            "warnings": warnings.len()
        }),
        reasoning: format!(
            "Margin discount {}%, volume discount {}% for {} shipments/month, promotions {}%",
            margin_discount_pct.normalize(),
            volume_discount_pct.normalize(),
            monthly_volume,
            promo_discount_pct.normalize()
        ),
    };

    DiscountResolution {
        discounts,
        warnings,
        audit_step,
    }
}

/// The result of discounting a tariff's margin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarginDiscountResult {
    /// `retail_price - purchase_price`.
    pub base_margin: Decimal,
    /// `base_margin * margin_discount_pct / 100`.
    pub discount_amount: Decimal,
    /// `purchase_price + (base_margin - discount_amount)`.
    pub discounted_retail_price: Decimal,
}

/// Gives away a percentage of the tariff's margin.
///
/// The customer pays cost plus the discounted margin; the discount is
/// never taken from the list price directly.
///
/// # Examples
///
/// ```
/// use tariff_engine::calculation::apply_margin_discount;
/// use tariff_engine::models::WeightRange;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let tariff = WeightRange {
///     id: "wr".to_string(),
///     min: Decimal::ZERO,
///     max: Decimal::ONE,
///     purchase_price: Decimal::from_str("5.5").unwrap(),
///     retail_price: Decimal::from_str("7.9").unwrap(),
/// };
/// let result = apply_margin_discount(&tariff, Decimal::from(20));
/// assert_eq!(result.discounted_retail_price, Decimal::from_str("7.42").unwrap());
/// ```
pub fn apply_margin_discount(tariff: &WeightRange, margin_discount_pct: Decimal) -> MarginDiscountResult {
    let base_margin = tariff.margin();
    let discount_amount = base_margin * margin_discount_pct / hundred();
    let discounted_retail_price = tariff.purchase_price + (base_margin - discount_amount);

    MarginDiscountResult {
        base_margin,
        discount_amount,
        discounted_retail_price,
    }
}

/// The result of discounting a total price.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceDiscountResult {
    /// The price the discount was applied to.
    pub total_base_price: Decimal,
    /// `total_base_price * pct / 100` before the margin cap.
    pub requested_amount: Decimal,
    /// The amount removed, at most the available margin.
    pub discount_amount: Decimal,
    /// `total_base_price - discount_amount`, never negative.
    pub discounted_price: Decimal,
    /// True when the requested amount exceeded the available margin.
    pub capped: bool,
}

/// Reduces a total price by a percentage, taking at most `available_margin`.
///
/// The percentage is clamped to `[0, 100]`. The amount removed never
/// exceeds the margin contained in the price, so stacked volume and
/// promotion discounts cannot push the price below cost. A negative
/// available margin allows no discount.
///
/// # Examples
///
/// ```
/// use tariff_engine::calculation::apply_price_discount;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// // 50% of 7.9 is 3.95, but only 2.4 of it is margin
/// let result = apply_price_discount(
///     Decimal::from_str("7.9").unwrap(),
///     Decimal::from(50),
///     Decimal::from_str("2.4").unwrap(),
/// );
/// assert!(result.capped);
/// assert_eq!(result.discounted_price, Decimal::from_str("5.5").unwrap());
/// ```
pub fn apply_price_discount(
    total_base_price: Decimal,
    discount_pct: Decimal,
    available_margin: Decimal,
) -> PriceDiscountResult {
    let pct = discount_pct.clamp(Decimal::ZERO, hundred());
    let requested_amount = total_base_price * pct / hundred();
    let ceiling = available_margin.max(Decimal::ZERO);
    let discount_amount = requested_amount.min(ceiling);
    let discounted_price = (total_base_price - discount_amount).max(Decimal::ZERO);

    PriceDiscountResult {
        total_base_price,
        requested_amount,
        discount_amount,
        discounted_price,
        capped: discount_amount < requested_amount,
    }
}
