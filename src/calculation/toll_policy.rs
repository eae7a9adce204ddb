//! Toll fee policy.

use rust_decimal::Decimal;

use crate::models::{AdditionalFee, AuditStep, Carrier};

/// The resolved per-shipment toll fee, including the audit step.
#[derive(Debug, Clone)]
pub struct TollResolution {
    /// The toll fee added after discounting.
    pub amount: Decimal,
    /// True when the carrier's fixed toll replaced the generic fees.
    pub fixed_override: bool,
    /// The audit step recording this resolution.
    pub audit_step: AuditStep,
}

/// Resolves the toll fee for a carrier's service.
///
/// The generic toll fee is the sum of every additional fee applicable to the
/// service. A carrier with a fixed toll override uses its fixed amount
/// instead; the fee data is ignored for it.
///
/// Toll fees are never discounted.
pub fn resolve_toll_fee(
    carrier: &Carrier,
    service_code: &str,
    fees: &[AdditionalFee],
    step_number: u32,
) -> TollResolution {
    let (amount, fixed_override, reasoning) = match carrier.fixed_toll_fee {
        Some(fixed) => (
            fixed,
            true,
            format!(
                "{} charges a fixed toll of {} per shipment",
                carrier.name,
                fixed.normalize()
            ),
        ),
        None => {
            let applicable: Vec<&AdditionalFee> =
                fees.iter().filter(|f| f.applies_to(service_code)).collect();
            let total: Decimal = applicable.iter().map(|f| f.amount).sum();
            let reasoning = if applicable.is_empty() {
                format!("No additional fees apply to {}", service_code)
            } else {
                let names: Vec<&str> = applicable.iter().map(|f| f.name.as_str()).collect();
                format!(
                    "Additional fees for {} ({}) total {}",
                    service_code,
                    names.join(", "),
                    total.normalize()
                )
            };
            (total, false, reasoning)
        }
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "toll_policy".to_string(),
        rule_name: "Toll Fee Policy".to_string(),
        input: serde_json::json!({
            "carrier": carrier.name,
            "service_code": service_code
        }),
        output: serde_json::json!({
            "toll_fee": amount.normalize().to_string(),
            "fixed_override": fixed_override
        }),
        reasoning,
    };

    TollResolution {
        amount,
        fixed_override,
        audit_step,
    }
}
