//! Request types for the tariff pricing API.
//!
//! This module defines the JSON request structures for the `/rates/calculate`,
//! `/rates/table` and `/quotes` endpoints.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculation::{DiscountOverrides, RateQuery, TableQuery};
use crate::models::{Destination, DiscountMode, Locale, Rate};

fn default_true() -> bool {
    true
}

/// Request body for the `/rates/calculate` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalculateRateRequest {
    /// The carrier id.
    pub carrier_id: String,
    /// The service code (e.g., "BUSINESS").
    pub service_code: String,
    /// Shipment weight in kg.
    pub weight_kg: Decimal,
    /// Where the shipment goes.
    pub destination: Destination,
    /// Operator margin discount percentage, 0 to 90.
    #[serde(default)]
    pub margin_discount: Decimal,
    /// Whether the fuel surcharge is part of the price.
    #[serde(default = "default_true")]
    pub include_fuel_surcharge: bool,
    /// Monthly shipment volume for volume discounts and the projection.
    #[serde(default)]
    pub monthly_volume: u32,
    /// Which discount semantics the calling screen uses.
    pub mode: DiscountMode,
    /// Instant promotions are evaluated at; defaults to now.
    #[serde(default)]
    pub as_of: Option<DateTime<Utc>>,
}

/// Request body for the `/rates/table` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateTableRequest {
    /// The carrier id.
    pub carrier_id: String,
    /// The service code.
    pub service_code: String,
    /// Where the shipments go.
    pub destination: Destination,
    /// Default operator margin discount percentage.
    #[serde(default)]
    pub margin_discount: Decimal,
    /// Per-row margin discounts keyed by weight range id.
    #[serde(default)]
    pub overrides: DiscountOverrides,
    /// Whether the fuel surcharge is part of the price.
    #[serde(default = "default_true")]
    pub include_fuel_surcharge: bool,
    /// Monthly shipment volume.
    #[serde(default)]
    pub monthly_volume: u32,
    /// Which discount semantics the calling screen uses.
    pub mode: DiscountMode,
    /// Instant promotions are evaluated at; defaults to now.
    #[serde(default)]
    pub as_of: Option<DateTime<Utc>>,
}

/// Request body for the `/quotes` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteRequest {
    /// Customer the quote is addressed to.
    #[serde(default)]
    pub customer_name: Option<String>,
    /// Rendering locale.
    #[serde(default)]
    pub locale: Locale,
    /// Finalized rates, in display order.
    pub lines: Vec<Rate>,
}

impl From<CalculateRateRequest> for RateQuery {
    fn from(req: CalculateRateRequest) -> Self {
        RateQuery {
            carrier_id: req.carrier_id,
            service_code: req.service_code,
            weight_kg: req.weight_kg,
            destination: req.destination,
            margin_discount: req.margin_discount,
            include_fuel_surcharge: req.include_fuel_surcharge,
            monthly_volume: req.monthly_volume,
            mode: req.mode,
        }
    }
}

impl From<RateTableRequest> for TableQuery {
    fn from(req: RateTableRequest) -> Self {
        TableQuery {
            carrier_id: req.carrier_id,
            service_code: req.service_code,
            destination: req.destination,
            margin_discount: req.margin_discount,
            overrides: req.overrides,
            include_fuel_surcharge: req.include_fuel_surcharge,
            monthly_volume: req.monthly_volume,
            mode: req.mode,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DestinationType;
    use std::str::FromStr;

    #[test]
    fn test_deserialize_calculate_rate_request() {
        let json = r#"{
            "carrier_id": "gls",
            "service_code": "BUSINESS",
            "weight_kg": "0.5",
            "destination": { "type": "eu", "country_code": "DE" },
            "margin_discount": "20",
            "include_fuel_surcharge": false,
            "monthly_volume": 120,
            "mode": "margin",
            "as_of": "2026-04-15T09:00:00Z"
        }"#;

        let request: CalculateRateRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.carrier_id, "gls");
        assert_eq!(request.weight_kg, Decimal::from_str("0.5").unwrap());
        assert_eq!(request.destination.destination_type, DestinationType::Eu);
        assert_eq!(request.destination.country_code.as_deref(), Some("DE"));
        assert!(!request.include_fuel_surcharge);
        assert!(request.as_of.is_some());
    }

    #[test]
    fn test_calculate_rate_request_defaults() {
        let json = r#"{
            "carrier_id": "brt",
            "service_code": "EXPRESS",
            "weight_kg": "1",
            "destination": { "type": "national" },
            "mode": "price"
        }"#;

        let request: CalculateRateRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.margin_discount, Decimal::ZERO);
        assert!(request.include_fuel_surcharge);
        assert_eq!(request.monthly_volume, 0);
        assert!(request.as_of.is_none());
    }

    #[test]
    fn test_mode_is_required() {
        let json = r#"{
            "carrier_id": "brt",
            "service_code": "EXPRESS",
            "weight_kg": "1",
            "destination": { "type": "national" }
        }"#;

        let result: Result<CalculateRateRequest, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }

    #[test]
    fn test_rate_table_request_with_overrides() {
        let json = r#"{
            "carrier_id": "gls",
            "service_code": "BUSINESS",
            "destination": { "type": "national" },
            "margin_discount": "10",
            "overrides": { "gls_nat_1_3": "40" },
            "mode": "margin"
        }"#;

        let request: RateTableRequest = serde_json::from_str(json).unwrap();
        let query: TableQuery = request.into();
        assert_eq!(
            query.overrides.get("gls_nat_1_3"),
            Some(Decimal::from_str("40").unwrap())
        );
        assert_eq!(query.mode, DiscountMode::Margin);
    }

    #[test]
    fn test_rate_query_conversion() {
        let request = CalculateRateRequest {
            carrier_id: "gls".to_string(),
            service_code: "BUSINESS".to_string(),
            weight_kg: Decimal::from(2),
            destination: Destination::national(),
            margin_discount: Decimal::from(15),
            include_fuel_surcharge: true,
            monthly_volume: 60,
            mode: DiscountMode::Price,
            as_of: None,
        };

        let query: RateQuery = request.into();
        assert_eq!(query.carrier_id, "gls");
        assert_eq!(query.monthly_volume, 60);
        assert_eq!(query.mode, DiscountMode::Price);
    }

    #[test]
    fn test_quote_request_locale_defaults_to_english() {
        let request: QuoteRequest = serde_json::from_str(r#"{ "lines": [] }"#).unwrap();
        assert_eq!(request.locale, Locale::En);
        assert!(request.customer_name.is_none());
    }
}
