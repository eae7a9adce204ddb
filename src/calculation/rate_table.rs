//! Rate table expansion.
//!
//! A rate table prices every weight range of one service and destination.
//! Operators can override the margin discount per row; those overrides live
//! in an explicit [`DiscountOverrides`] store that is passed in, so the
//! calculation stays a pure function of its arguments.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{AuditWarning, RateRow, RowError, WeightRange};

use super::margin::{RateInputs, compute_rate};

/// Per-row margin discount overrides, keyed by weight range id.
///
/// # Example
///
/// ```
/// use tariff_engine::calculation::DiscountOverrides;
/// use rust_decimal::Decimal;
///
/// let mut overrides = DiscountOverrides::default();
/// overrides.set("gls_nat_0_1", Decimal::from(35));
/// assert_eq!(overrides.get("gls_nat_0_1"), Some(Decimal::from(35)));
/// assert_eq!(overrides.get("gls_nat_1_3"), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DiscountOverrides {
    by_rate_id: HashMap<String, Decimal>,
}

impl DiscountOverrides {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the margin discount for a weight range.
    pub fn set(&mut self, rate_id: impl Into<String>, margin_discount: Decimal) {
        self.by_rate_id.insert(rate_id.into(), margin_discount);
    }

    /// Returns the override for a weight range, if any.
    pub fn get(&self, rate_id: &str) -> Option<Decimal> {
        self.by_rate_id.get(rate_id).copied()
    }

    /// Removes the override for a weight range, returning it.
    pub fn remove(&mut self, rate_id: &str) -> Option<Decimal> {
        self.by_rate_id.remove(rate_id)
    }

    /// Returns the margin discount for a row: its override, or `default`.
    pub fn resolve(&self, rate_id: &str, default: Decimal) -> Decimal {
        self.get(rate_id).unwrap_or(default)
    }

    /// Returns true when no overrides are set.
    pub fn is_empty(&self) -> bool {
        self.by_rate_id.is_empty()
    }
}

/// The rows of a rate table and the warnings raised while pricing them.
#[derive(Debug, Clone)]
pub struct RateTableRows {
    /// One row per weight range, in weight order.
    pub rows: Vec<RateRow>,
    /// Warnings from successfully priced rows.
    pub warnings: Vec<AuditWarning>,
}

/// Prices every weight range with the shared `inputs`.
///
/// Each row uses its override from `overrides`, falling back to the margin
/// discount in `inputs`. A row that fails (`InvalidDiscount`,
/// `ArithmeticGuard`) carries a [`RowError`] and the remaining rows are
/// still priced.
pub fn compute_rate_table(
    inputs: &RateInputs<'_>,
    weight_ranges: &[WeightRange],
    overrides: &DiscountOverrides,
) -> RateTableRows {
    let mut rows = Vec::with_capacity(weight_ranges.len());
    let mut warnings = Vec::new();

    for range in weight_ranges {
        let margin_discount =
            overrides.resolve(&range.id, inputs.discounts.margin_discount_pct);
        let row_inputs = RateInputs {
            discounts: inputs.discounts.with_margin_discount(margin_discount),
            ..inputs.clone()
        };

        let (rate, error) = match compute_rate(&row_inputs, range, 1) {
            Ok(computed) => {
                warnings.extend(computed.warnings);
                (Some(computed.rate), None)
            }
            Err(err) => (
                None,
                Some(RowError {
                    code: err.code().to_string(),
                    message: err.to_string(),
                }),
            ),
        };

        rows.push(RateRow {
            rate_id: range.id.clone(),
            weight_min: range.min,
            weight_max: range.max,
            rate,
            error,
        });
    }

    RateTableRows { rows, warnings }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculation::ResolvedDiscounts;
    use crate::config::MarginThresholds;
    use crate::models::{Carrier, DiscountMode};
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn range(id: &str, min: &str, max: &str, purchase: &str, retail: &str) -> WeightRange {
        WeightRange {
            id: id.to_string(),
            min: dec(min),
            max: dec(max),
            purchase_price: dec(purchase),
            retail_price: dec(retail),
        }
    }

    fn create_test_carrier() -> Carrier {
        Carrier {
            id: "brt".to_string(),
            name: "BRT".to_string(),
            fuel_surcharge: dec("10"),
            is_volumetric: false,
            is_active: true,
            services: vec![],
            fixed_toll_fee: None,
        }
    }

    fn inputs<'a>(carrier: &'a Carrier, thresholds: &'a MarginThresholds) -> RateInputs<'a> {
        RateInputs {
            carrier,
            service_code: "EXPRESS",
            discounts: ResolvedDiscounts {
                margin_discount_pct: dec("20"),
                volume_discount_pct: Decimal::ZERO,
                promo_discount_pct: Decimal::ZERO,
            },
            include_fuel_surcharge: true,
            toll_fee: Decimal::ZERO,
            fixed_toll_override: false,
            monthly_volume: 0,
            mode: DiscountMode::Margin,
            thresholds,
        }
    }

    fn ranges() -> Vec<WeightRange> {
        vec![
            range("r1", "0", "1", "5.5", "7.9"),
            range("r2", "1.01", "3", "6.2", "8.9"),
            range("r3", "3.01", "10", "8", "11.5"),
        ]
    }

    /// RT-001: every weight range becomes a row in order
    #[test]
    fn test_rows_in_weight_order() {
        let carrier = create_test_carrier();
        let thresholds = MarginThresholds::default();

        let table = compute_rate_table(&inputs(&carrier, &thresholds), &ranges(), &DiscountOverrides::new());

        let ids: Vec<&str> = table.rows.iter().map(|r| r.rate_id.as_str()).collect();
        assert_eq!(ids, vec!["r1", "r2", "r3"]);
        assert!(table.rows.iter().all(RateRow::is_available));
        assert_eq!(table.rows[0].rate.as_ref().unwrap().final_price, dec("8.162"));
    }

    /// RT-002: a row override replaces the default margin discount for that row only
    #[test]
    fn test_override_applies_to_its_row() {
        let carrier = create_test_carrier();
        let thresholds = MarginThresholds::default();
        let mut overrides = DiscountOverrides::new();
        overrides.set("r2", dec("50"));

        let table = compute_rate_table(&inputs(&carrier, &thresholds), &ranges(), &overrides);

        assert_eq!(table.rows[0].rate.as_ref().unwrap().user_discount, dec("20"));
        assert_eq!(table.rows[1].rate.as_ref().unwrap().user_discount, dec("50"));
        assert_eq!(table.rows[2].rate.as_ref().unwrap().user_discount, dec("20"));
    }

    /// RT-003: an invalid override fails only its own row
    #[test]
    fn test_invalid_override_fails_single_row() {
        let carrier = create_test_carrier();
        let thresholds = MarginThresholds::default();
        let mut overrides = DiscountOverrides::new();
        overrides.set("r1", dec("95"));

        let table = compute_rate_table(&inputs(&carrier, &thresholds), &ranges(), &overrides);

        let error = table.rows[0].error.as_ref().unwrap();
        assert_eq!(error.code, "INVALID_DISCOUNT");
        assert!(table.rows[0].rate.is_none());
        assert!(table.rows[1].is_available());
        assert!(table.rows[2].is_available());
    }

    /// RT-004: malformed tariff data fails only its own row
    #[test]
    fn test_zero_purchase_price_fails_single_row() {
        let carrier = create_test_carrier();
        let thresholds = MarginThresholds::default();
        let mut data = ranges();
        data[1].purchase_price = Decimal::ZERO;

        let table = compute_rate_table(&inputs(&carrier, &thresholds), &data, &DiscountOverrides::new());

        assert_eq!(table.rows[1].error.as_ref().unwrap().code, "ARITHMETIC_GUARD");
        assert!(table.rows[0].is_available());
        assert!(table.rows[2].is_available());
    }

    #[test]
    fn test_row_warnings_collected() {
        let carrier = create_test_carrier();
        let thresholds = MarginThresholds::default();
        let data = vec![range("loss", "0", "1", "9", "8")];

        let table = compute_rate_table(&inputs(&carrier, &thresholds), &data, &DiscountOverrides::new());

        let codes: Vec<&str> = table.warnings.iter().map(|w| w.code.as_str()).collect();
        assert_eq!(codes, vec!["NEGATIVE_BASE_MARGIN", "NEGATIVE_MARGIN"]);
    }

    /// RT-005: an out-of-range default fails only the rows that fall back to it
    #[test]
    fn test_invalid_default_discount_fails_only_default_rows() {
        let carrier = create_test_carrier();
        let thresholds = MarginThresholds::default();
        let mut inputs = inputs(&carrier, &thresholds);
        inputs.discounts = inputs.discounts.with_margin_discount(dec("95"));
        let mut overrides = DiscountOverrides::new();
        overrides.set("r1", dec("20"));

        let table = compute_rate_table(&inputs, &ranges(), &overrides);

        assert_eq!(table.rows[0].rate.as_ref().unwrap().final_price, dec("8.162"));
        assert_eq!(table.rows[1].error.as_ref().unwrap().code, "INVALID_DISCOUNT");
        assert_eq!(table.rows[2].error.as_ref().unwrap().code, "INVALID_DISCOUNT");
    }

    #[test]
    fn test_overrides_store_operations() {
        let mut overrides = DiscountOverrides::new();
        assert!(overrides.is_empty());

        overrides.set("r1", dec("10"));
        overrides.set("r1", dec("15"));
        assert_eq!(overrides.resolve("r1", dec("20")), dec("15"));
        assert_eq!(overrides.resolve("r2", dec("20")), dec("20"));

        assert_eq!(overrides.remove("r1"), Some(dec("15")));
        assert!(overrides.is_empty());
    }

    #[test]
    fn test_overrides_deserialize_from_map() {
        let overrides: DiscountOverrides =
            serde_json::from_str(r#"{"r1": "30", "r3": "0"}"#).unwrap();

        assert_eq!(overrides.get("r1"), Some(dec("30")));
        assert_eq!(overrides.get("r3"), Some(Decimal::ZERO));
    }
}
