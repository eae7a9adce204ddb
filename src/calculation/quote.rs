//! Quote aggregation.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::models::{Locale, Quote, QuoteTotals, Rate};

/// Sums final prices, purchase prices and margins across rates.
pub fn quote_totals(lines: &[Rate]) -> QuoteTotals {
    QuoteTotals {
        line_count: lines.len(),
        total_final_price: lines.iter().map(|r| r.final_price).sum(),
        total_purchase_price: lines.iter().map(|r| r.purchase_price).sum(),
        total_margin: lines.iter().map(|r| r.actual_margin).sum::<Decimal>(),
    }
}

/// Assembles finalized rates into a quote for the document generator.
///
/// Rates are kept in the given order and are not recomputed.
pub fn build_quote(
    lines: Vec<Rate>,
    locale: Locale,
    customer_name: Option<String>,
    created_at: DateTime<Utc>,
) -> Quote {
    let totals = quote_totals(&lines);
    Quote {
        quote_id: Uuid::new_v4(),
        created_at,
        customer_name,
        locale,
        lines,
        totals,
    }
}
