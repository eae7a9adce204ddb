//! Core data models for the tariff pricing engine.
//!
//! This module contains the reference data the engine consumes (carriers,
//! services, tariffs, discounts) and the values it produces (rates, tables,
//! quotes, audit traces).

mod calculation_result;
mod carrier;
mod discount;
mod quote;
mod rate;
mod tariff;

pub use calculation_result::{
    AuditStep, AuditTrace, AuditWarning, RateResult, RateRow, RateTable, RowError,
};
pub use carrier::{Carrier, Destination, DestinationType, Service};
pub use discount::{AdditionalFee, Promotion, VolumeDiscount};
pub use quote::{Locale, Quote, QuoteTotals};
pub use rate::{DiscountMode, FuelBreakdown, MarginPercentage, MarginTier, Rate};
pub use tariff::{Pricing, WeightRange};
