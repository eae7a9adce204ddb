//! Calculation logic for the tariff pricing engine.
//!
//! This module contains the pricing pipeline: tariff lookup, discount stack
//! resolution, fuel surcharge, toll policy, margin and final price, rate
//! table expansion and quote aggregation. Apart from [`calculate_rate`] and
//! [`calculate_rate_table`], which read the loaded catalogue, every function
//! here is a pure function of its arguments.

mod discount_stack;
mod engine;
mod fuel_surcharge;
mod margin;
mod quote;
mod rate_table;
mod tariff_lookup;
mod toll_policy;

pub use discount_stack::{
    DISCOUNT_CAPPED, DiscountResolution, MULTIPLE_PROMOTIONS, MarginDiscountResult,
    PriceDiscountResult, ResolvedDiscounts, apply_margin_discount, apply_price_discount,
    max_margin_discount, resolve_discounts, resolve_promotion_discount, resolve_volume_discount,
    validate_margin_discount,
};
pub use engine::{INACTIVE_CARRIER, RateQuery, TableQuery, calculate_rate, calculate_rate_table};
pub use fuel_surcharge::{FuelSurchargeResult, apply_fuel_surcharge};
pub use margin::{
    ComputedRate, NEGATIVE_BASE_MARGIN, NEGATIVE_MARGIN, RateInputs, compute_rate,
    margin_percentage, margin_tier, monthly_margin,
};
pub use quote::{build_quote, quote_totals};
pub use rate_table::{DiscountOverrides, RateTableRows, compute_rate_table};
pub use tariff_lookup::{TariffLookupResult, find_tariff, select_pricing};
pub use toll_policy::{TollResolution, resolve_toll_fee};
