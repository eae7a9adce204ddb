//! Quote models handed to the document generator.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Rate;

/// Locales the quote renderer supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    /// English.
    #[default]
    En,
    /// Italian.
    It,
    /// German.
    De,
    /// Spanish.
    Es,
}

/// Aggregated totals across the rates of a quote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteTotals {
    /// Number of rates in the quote.
    pub line_count: usize,
    /// Sum of customer-facing final prices.
    pub total_final_price: Decimal,
    /// Sum of purchase prices.
    pub total_purchase_price: Decimal,
    /// Sum of reseller margins.
    pub total_margin: Decimal,
}

/// A finalized quote: an ordered list of rates and their totals.
///
/// Downstream renderers only format these numbers; they never recompute them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    /// Unique identifier for the quote.
    pub quote_id: Uuid,
    /// When the quote was assembled.
    pub created_at: DateTime<Utc>,
    /// Customer the quote is addressed to.
    #[serde(default)]
    pub customer_name: Option<String>,
    /// Rendering locale.
    pub locale: Locale,
    /// The selected rates, in display order.
    pub lines: Vec<Rate>,
    /// Totals across `lines`.
    pub totals: QuoteTotals,
}
