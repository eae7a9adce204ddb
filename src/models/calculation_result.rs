//! Calculation result models for the tariff pricing engine.
//!
//! This module contains the [`RateResult`] and [`RateTable`] types that wrap
//! computed rates together with the audit trace that explains them.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Destination, DiscountMode, Rate};

/// A single step in the audit trace recording a pricing decision.
///
/// Each step captures the input, output, and reasoning for a rule application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStep {
    /// The sequential step number.
    pub step_number: u32,
    /// The unique identifier of the rule that was applied.
    pub rule_id: String,
    /// The human-readable name of the rule.
    pub rule_name: String,
    /// The input data for this step.
    pub input: serde_json::Value,
    /// The output data from this step.
    pub output: serde_json::Value,
    /// Human-readable explanation of the decision.
    pub reasoning: String,
}

/// A non-fatal problem found while pricing or while loading reference data.
///
/// Warnings never stop a calculation; the engine applies a defined
/// tie-break and reports what it did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditWarning {
    /// A code identifying the type of warning.
    pub code: String,
    /// A human-readable description of the warning.
    pub message: String,
    /// The severity level (e.g., "low", "medium", "high").
    pub severity: String,
}

impl AuditWarning {
    /// Creates a new warning.
    pub fn new(
        code: impl Into<String>,
        message: impl Into<String>,
        severity: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            severity: severity.into(),
        }
    }
}

/// The complete audit trace for a calculation.
///
/// # Example
///
/// ```
/// use tariff_engine::models::AuditTrace;
///
/// let trace = AuditTrace {
///     steps: vec![],
///     warnings: vec![],
///     duration_us: 1234,
/// };
/// assert!(trace.warnings.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditTrace {
    /// The sequence of calculation steps.
    pub steps: Vec<AuditStep>,
    /// Any warnings generated during calculation.
    pub warnings: Vec<AuditWarning>,
    /// The total calculation duration in microseconds.
    pub duration_us: u64,
}

/// The result of pricing a single shipment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateResult {
    /// Unique identifier for this calculation.
    pub calculation_id: Uuid,
    /// When the calculation was performed.
    pub timestamp: DateTime<Utc>,
    /// The version of the engine that performed the calculation.
    pub engine_version: String,
    /// The shipment weight that was priced.
    pub weight_kg: Decimal,
    /// The destination that was priced.
    pub destination: Destination,
    /// The computed rate.
    pub rate: Rate,
    /// Complete audit trace of pricing decisions.
    pub audit_trace: AuditTrace,
}

/// A per-row failure in a rate table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowError {
    /// Machine-readable error code (e.g., "ARITHMETIC_GUARD").
    pub code: String,
    /// Human-readable description.
    pub message: String,
}

/// One row of an expanded rate table.
///
/// Exactly one of `rate` and `error` is set. A failed row renders as
/// "unavailable" without affecting the rest of the table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateRow {
    /// The weight range id.
    pub rate_id: String,
    /// Lower bound of the weight range in kg.
    pub weight_min: Decimal,
    /// Upper bound of the weight range in kg.
    pub weight_max: Decimal,
    /// The computed rate, when the row priced successfully.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rate: Option<Rate>,
    /// The failure, when the row could not be priced.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<RowError>,
}

impl RateRow {
    /// Returns true when the row carries a rate.
    pub fn is_available(&self) -> bool {
        self.rate.is_some()
    }
}

/// Every weight range of one service and destination, priced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateTable {
    /// Unique identifier for this calculation.
    pub calculation_id: Uuid,
    /// When the calculation was performed.
    pub timestamp: DateTime<Utc>,
    /// The carrier id.
    pub carrier_id: String,
    /// The service code.
    pub service_code: String,
    /// The destination that was priced.
    pub destination: Destination,
    /// The discount semantics used for every row.
    pub mode: DiscountMode,
    /// Rows in weight order.
    pub rows: Vec<RateRow>,
    /// Warnings raised while resolving shared inputs (discounts, pricing).
    pub warnings: Vec<AuditWarning>,
}
