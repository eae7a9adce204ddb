//! Fuel surcharge calculation.
//!
//! Fuel surcharge is asymmetric: the customer pays the carrier percentage on
//! the price they are charged, the reseller pays it to the carrier on the
//! purchase price. The difference is fuel margin.

use rust_decimal::Decimal;

use crate::models::{AuditStep, FuelBreakdown};

/// The result of a fuel surcharge calculation, including the audit step.
#[derive(Debug, Clone)]
pub struct FuelSurchargeResult {
    /// The customer/supplier split.
    pub fuel: FuelBreakdown,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Applies a carrier's fuel surcharge percentage.
///
/// `customer_base` is the price the customer-side surcharge is computed on:
/// the discounted retail price in margin mode, the retail price in price
/// mode. When `include` is false no surcharge is charged or paid, and the
/// customer-side amount is reported only as `foregone_amount`.
///
/// # Examples
///
/// ```
/// use tariff_engine::calculation::apply_fuel_surcharge;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let result = apply_fuel_surcharge(
///     Decimal::from_str("7.42").unwrap(),
///     Decimal::from_str("5.5").unwrap(),
///     Decimal::from(10),
///     true,
///     1,
/// );
/// assert_eq!(result.fuel.customer_amount, Decimal::from_str("0.742").unwrap());
/// assert_eq!(result.fuel.supplier_amount, Decimal::from_str("0.55").unwrap());
/// ```
pub fn apply_fuel_surcharge(
    customer_base: Decimal,
    purchase_price: Decimal,
    fuel_pct: Decimal,
    include: bool,
    step_number: u32,
) -> FuelSurchargeResult {
    let foregone_amount = customer_base * fuel_pct / Decimal::ONE_HUNDRED;

    let (customer_amount, supplier_amount) = if include {
        (foregone_amount, purchase_price * fuel_pct / Decimal::ONE_HUNDRED)
    } else {
        (Decimal::ZERO, Decimal::ZERO)
    };
    let fuel_margin = customer_amount - supplier_amount;

    let reasoning = if include {
        format!(
            "Fuel {}%: customer pays {} on {}, carrier charged {} on {}, fuel margin {}",
            fuel_pct.normalize(),
            customer_amount.normalize(),
            customer_base.normalize(),
            supplier_amount.normalize(),
            purchase_price.normalize(),
            fuel_margin.normalize()
        )
    } else {
        format!(
            "Fuel not included ({}% = {})",
            fuel_pct.normalize(),
            foregone_amount.normalize()
        )
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "fuel_surcharge".to_string(),
        rule_name: "Fuel Surcharge".to_string(),
        input: serde_json::json!({
            "customer_base": customer_base.normalize().to_string(),
            "purchase_price": purchase_price.normalize().to_string(),
            "fuel_percentage": fuel_pct.normalize().to_string(),
            "included": include
        }),
        output: serde_json::json!({
            "customer_amount": customer_amount.normalize().to_string(),
            "supplier_amount": supplier_amount.normalize().to_string(),
            "fuel_margin": fuel_margin.normalize().to_string(),
            "foregone_amount": foregone_amount.normalize().to_string()
        }),
        reasoning,
    };

    FuelSurchargeResult {
        fuel: FuelBreakdown {
            percentage: fuel_pct,
            included: include,
            customer_amount,
            supplier_amount,
            fuel_margin,
            foregone_amount,
        },
        audit_step,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    /// FS-001: included surcharge splits customer and supplier sides
    #[test]
    fn test_included_fuel_split() {
        let result = apply_fuel_surcharge(dec("7.42"), dec("5.5"), dec("10"), true, 3);

        assert!(result.fuel.included);
        assert_eq!(result.fuel.customer_amount, dec("0.742"));
        assert_eq!(result.fuel.supplier_amount, dec("0.55"));
        assert_eq!(result.fuel.fuel_margin, dec("0.192"));
        assert_eq!(result.fuel.foregone_amount, dec("0.742"));
    }

    /// FS-002: excluded surcharge contributes nothing but reports foregone amount
    #[test]
    fn test_excluded_fuel_is_zero_with_foregone_amount() {
        let result = apply_fuel_surcharge(dec("7.42"), dec("5.5"), dec("10"), false, 3);

        assert!(!result.fuel.included);
        assert_eq!(result.fuel.customer_amount, Decimal::ZERO);
        assert_eq!(result.fuel.supplier_amount, Decimal::ZERO);
        assert_eq!(result.fuel.fuel_margin, Decimal::ZERO);
        assert_eq!(result.fuel.foregone_amount, dec("0.742"));
        assert_eq!(result.audit_step.reasoning, "Fuel not included (10% = 0.742)");
    }

    #[test]
    fn test_zero_fuel_percentage() {
        let result = apply_fuel_surcharge(dec("7.9"), dec("5.5"), Decimal::ZERO, true, 1);

        assert_eq!(result.fuel.customer_amount, Decimal::ZERO);
        assert_eq!(result.fuel.fuel_margin, Decimal::ZERO);
    }

    #[test]
    fn test_audit_step() {
        let result = apply_fuel_surcharge(dec("7.42"), dec("5.5"), dec("10"), true, 3);

        assert_eq!(result.audit_step.step_number, 3);
        assert_eq!(result.audit_step.rule_id, "fuel_surcharge");
        assert_eq!(result.audit_step.output["fuel_margin"], "0.192");
        assert_eq!(result.audit_step.input["included"], true);
    }
}
