//! The computed rate and its pricing breakdown.
//!
//! A [`Rate`] is never persisted. It is produced on every recompute and
//! carries every intermediate amount so that renderers and the quote
//! exporter never need to recompute anything.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Which discount semantics a calculation uses.
///
/// The two modes coexist on different screens and produce different margins
/// for the same inputs, so every request names one explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscountMode {
    /// The operator discount is a percentage of the margin given away.
    Margin,
    /// Volume and promotion discounts reduce the post-fuel total price.
    Price,
}

/// A margin expressed as a percentage of the discounted price.
///
/// Badge thresholds only accept this type, so absolute currency amounts
/// cannot be classified by mistake.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MarginPercentage(pub Decimal);

impl MarginPercentage {
    /// Returns the raw percentage value.
    pub fn value(&self) -> Decimal {
        self.0
    }
}

/// Margin badge classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarginTier {
    /// At or above the high threshold (25% by default).
    High,
    /// At or above the medium threshold (15% by default).
    Medium,
    /// Below the medium threshold.
    Low,
}

/// The fuel surcharge split between customer and supplier.
///
/// When the surcharge is excluded every amount is zero, but `foregone_amount`
/// still reports what the customer would have paid so renderers can show
/// "fuel not included (X% = Y)".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FuelBreakdown {
    /// The carrier fuel surcharge percentage.
    pub percentage: Decimal,
    /// Whether the surcharge is part of the price.
    pub included: bool,
    /// Surcharge charged to the customer.
    pub customer_amount: Decimal,
    /// Surcharge paid to the carrier.
    pub supplier_amount: Decimal,
    /// `customer_amount - supplier_amount`.
    pub fuel_margin: Decimal,
    /// The customer-side amount that would apply if the surcharge were included.
    pub foregone_amount: Decimal,
}

/// The engine's output for one weight range of one service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rate {
    /// The weight range this rate was computed from.
    pub rate_id: String,
    /// The carrier id.
    pub carrier_id: String,
    /// The carrier display name.
    pub carrier_name: String,
    /// The service code.
    pub service_code: String,
    /// Lower bound of the weight range in kg.
    pub weight_min: Decimal,
    /// Upper bound of the weight range in kg.
    pub weight_max: Decimal,
    /// The discount semantics used.
    pub mode: DiscountMode,
    /// Undiscounted list price, including any fixed toll override.
    pub base_price: Decimal,
    /// Cost paid to the carrier.
    pub purchase_price: Decimal,
    /// Operator margin discount percentage (0 to 90).
    pub user_discount: Decimal,
    /// Volume discount percentage matched for the monthly volume.
    pub volume_discount: Decimal,
    /// Sum of active promotion percentages.
    pub promo_discount: Decimal,
    /// `retail_price - purchase_price`.
    pub base_margin: Decimal,
    /// Amount removed by the discount (from margin or from price, per mode).
    pub discount_amount: Decimal,
    /// Price after discounting, before toll (and before fuel in margin mode).
    pub discounted_price: Decimal,
    /// Fuel surcharge breakdown.
    pub fuel: FuelBreakdown,
    /// Fixed per-shipment toll fee.
    pub toll_fee: Decimal,
    /// Price quoted to the customer.
    pub final_price: Decimal,
    /// Margin retained by the reseller.
    pub actual_margin: Decimal,
    /// Margin as a percentage of the discounted price.
    pub margin_percentage: MarginPercentage,
    /// Badge classification of `margin_percentage`.
    pub margin_tier: MarginTier,
    /// Monthly shipment volume used for the projection.
    pub monthly_volume: u32,
    /// `(final_price - purchase_price) * monthly_volume`.
    pub monthly_margin: Decimal,
}

impl Rate {
    /// Returns true when discounting has eroded the margin to zero or below.
    ///
    /// The toll fee is a pass-through and does not count as margin here.
    pub fn is_margin_eroded(&self) -> bool {
        self.actual_margin - self.toll_fee <= Decimal::ZERO
    }
}
