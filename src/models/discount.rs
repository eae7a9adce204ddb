//! Volume discount, promotion and additional fee models.
//!
//! All three are scoped to services by service code. A code that no longer
//! exists in the catalogue simply never matches.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A discount tier keyed by monthly shipment volume.
///
/// The band is half-open: `[min_volume, max_volume)`, with `max_volume = None`
/// meaning unbounded.
///
/// # Example
///
/// ```
/// use tariff_engine::models::VolumeDiscount;
/// use rust_decimal::Decimal;
///
/// let band = VolumeDiscount {
///     id: "vd_100".to_string(),
///     min_volume: 100,
///     max_volume: Some(500),
///     discount_percentage: Decimal::from(5),
///     applicable_services: vec!["EXPRESS".to_string()],
/// };
/// assert!(band.contains(100));
/// assert!(!band.contains(500));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolumeDiscount {
    /// Unique identifier for the band.
    pub id: String,
    /// Lowest monthly volume in the band (inclusive).
    pub min_volume: u32,
    /// Upper bound of the band (exclusive), or unbounded.
    #[serde(default)]
    pub max_volume: Option<u32>,
    /// Discount percentage granted in this band.
    pub discount_percentage: Decimal,
    /// Service codes the band applies to.
    #[serde(default)]
    pub applicable_services: Vec<String>,
}

impl VolumeDiscount {
    /// Returns true when `monthly_volume` falls within the band.
    pub fn contains(&self, monthly_volume: u32) -> bool {
        monthly_volume >= self.min_volume
            && self.max_volume.is_none_or(|max| monthly_volume < max)
    }

    /// Returns true when the band applies to the given service code.
    pub fn applies_to(&self, service_code: &str) -> bool {
        self.applicable_services.iter().any(|s| s == service_code)
    }

    /// Returns true when two half-open bands share at least one volume.
    pub fn overlaps(&self, other: &VolumeDiscount) -> bool {
        let self_below_other_end = other.max_volume.is_none_or(|max| self.min_volume < max);
        let other_below_self_end = self.max_volume.is_none_or(|max| other.min_volume < max);
        self_below_other_end && other_below_self_end
    }
}

/// A time-boxed promotional discount.
///
/// The interval is closed: a promotion is active from `start_date` through
/// `end_date`, both instants included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Promotion {
    /// Unique identifier for the promotion.
    pub id: String,
    /// Campaign name.
    pub name: String,
    /// Discount percentage granted while active.
    pub discount_percentage: Decimal,
    /// First instant the promotion applies.
    pub start_date: DateTime<Utc>,
    /// Last instant the promotion applies.
    pub end_date: DateTime<Utc>,
    /// Service codes the promotion applies to.
    #[serde(default)]
    pub applicable_services: Vec<String>,
    /// Manual kill switch, independent of the dates.
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

impl Promotion {
    /// Returns true when the promotion is switched on and `now` is within its interval.
    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        self.is_active && self.start_date <= now && now <= self.end_date
    }

    /// Returns true when the promotion applies to the given service code.
    pub fn applies_to(&self, service_code: &str) -> bool {
        self.applicable_services.iter().any(|s| s == service_code)
    }
}

/// A fixed per-shipment fee such as a toll, added after margin and never discounted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdditionalFee {
    /// Unique identifier for the fee.
    pub id: String,
    /// Fee name (e.g., "Toll").
    pub name: String,
    /// Fixed amount in currency units.
    pub amount: Decimal,
    /// Service codes the fee applies to.
    #[serde(default)]
    pub applicable_services: Vec<String>,
}

impl AdditionalFee {
    /// Returns true when the fee applies to the given service code.
    pub fn applies_to(&self, service_code: &str) -> bool {
        self.applicable_services.iter().any(|s| s == service_code)
    }
}
