//! Pricing and weight-range tariff models.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::DestinationType;

/// A single weight-banded tariff: what the reseller pays and what it lists.
///
/// The margin is always derived from the two prices and never stored.
///
/// # Example
///
/// ```
/// use tariff_engine::models::WeightRange;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let range = WeightRange {
///     id: "wr_0_1".to_string(),
///     min: Decimal::ZERO,
///     max: Decimal::ONE,
///     purchase_price: Decimal::from_str("5.5").unwrap(),
///     retail_price: Decimal::from_str("7.9").unwrap(),
/// };
/// assert_eq!(range.margin(), Decimal::from_str("2.4").unwrap());
/// assert!(range.contains(Decimal::ONE));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeightRange {
    /// Identifier used to key per-row discount overrides.
    pub id: String,
    /// Lower bound in kg (inclusive).
    pub min: Decimal,
    /// Upper bound in kg (inclusive).
    pub max: Decimal,
    /// Cost paid to the carrier.
    pub purchase_price: Decimal,
    /// Undiscounted list price to the customer.
    #[serde(alias = "base_price")]
    pub retail_price: Decimal,
}

impl WeightRange {
    /// Returns `retail_price - purchase_price`.
    pub fn margin(&self) -> Decimal {
        self.retail_price - self.purchase_price
    }

    /// Returns true when `weight_kg` lies in `[min, max]`.
    pub fn contains(&self, weight_kg: Decimal) -> bool {
        self.min <= weight_kg && weight_kg <= self.max
    }

    /// Returns true when the two closed ranges share at least one weight.
    pub fn overlaps(&self, other: &WeightRange) -> bool {
        self.min <= other.max && other.min <= self.max
    }
}

/// Destination-specific pricing of a service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pricing {
    /// The destination class this pricing applies to.
    pub destination_type: DestinationType,
    /// Country code, or `None` for every country of the destination type.
    #[serde(default)]
    pub country_code: Option<String>,
    /// Weight ranges, ordered by `min`.
    pub weight_ranges: Vec<WeightRange>,
}

impl Pricing {
    /// Returns true when this entry applies to every country of its type.
    pub fn is_wildcard(&self) -> bool {
        self.country_code.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn range(min: &str, max: &str) -> WeightRange {
        WeightRange {
            id: format!("wr_{}_{}", min, max),
            min: dec(min),
            max: dec(max),
            purchase_price: dec("5.50"),
            retail_price: dec("7.90"),
        }
    }

    #[test]
    fn test_margin_is_derived_from_prices() {
        let mut r = range("0", "1");
        assert_eq!(r.margin(), dec("2.40"));

        r.retail_price = dec("9.00");
        assert_eq!(r.margin(), dec("3.50"));
    }

    #[test]
    fn test_contains_is_inclusive_at_both_ends() {
        let r = range("1", "3");
        assert!(r.contains(dec("1")));
        assert!(r.contains(dec("3")));
        assert!(r.contains(dec("2.5")));
        assert!(!r.contains(dec("0.99")));
        assert!(!r.contains(dec("3.01")));
    }

    #[test]
    fn test_shared_boundary_counts_as_overlap() {
        assert!(range("0", "1").overlaps(&range("1", "3")));
        assert!(!range("0", "1").overlaps(&range("1.01", "3")));
    }

    #[test]
    fn test_retail_price_accepts_base_price_alias() {
        let json = r#"{
            "id": "wr_1",
            "min": "0",
            "max": "1",
            "purchase_price": "5.5",
            "base_price": "7.9"
        }"#;

        let r: WeightRange = serde_json::from_str(json).unwrap();
        assert_eq!(r.retail_price, dec("7.9"));
    }

    #[test]
    fn test_pricing_without_country_is_wildcard() {
        let json = r#"{
            "destination_type": "eu",
            "weight_ranges": []
        }"#;

        let pricing: Pricing = serde_json::from_str(json).unwrap();
        assert!(pricing.is_wildcard());
    }
}
