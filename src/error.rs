//! Error types for the tariff pricing engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur while pricing a shipment.
//! Data-consistency problems are not errors; they are reported as
//! [`AuditWarning`](crate::models::AuditWarning)s and computation proceeds.

use rust_decimal::Decimal;
use thiserror::Error;

/// The main error type for the tariff pricing engine.
///
/// # Example
///
/// ```
/// use tariff_engine::error::EngineError;
///
/// let error = EngineError::ConfigNotFound {
///     path: "/missing/carriers.yaml".to_string(),
/// };
/// assert_eq!(error.to_string(), "Configuration file not found: /missing/carriers.yaml");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// Carrier id was not found in the catalogue.
    #[error("Carrier not found: {carrier_id}")]
    CarrierNotFound {
        /// The carrier id that was not found.
        carrier_id: String,
    },

    /// Service code was not found for the carrier.
    #[error("Service '{service_code}' not found for carrier '{carrier_id}'")]
    ServiceNotFound {
        /// The carrier the service was looked up on.
        carrier_id: String,
        /// The service code that was not found.
        service_code: String,
    },

    /// The service has no pricing for the destination.
    #[error("Service '{service_code}' has no pricing for {destination}")]
    PricingNotFound {
        /// The service code.
        service_code: String,
        /// The destination, formatted as `type` or `type/country`.
        destination: String,
    },

    /// No weight range covers the shipment for the destination.
    #[error("No tariff for service '{service_code}' at {weight_kg} kg to {destination}")]
    TariffNotFound {
        /// The service code.
        service_code: String,
        /// The requested shipment weight.
        weight_kg: Decimal,
        /// The destination, formatted as `type` or `type/country`.
        destination: String,
    },

    /// An operator-entered discount is outside the accepted range.
    #[error("Invalid discount {value}%: must be between 0 and {max}")]
    InvalidDiscount {
        /// The rejected value.
        value: Decimal,
        /// The maximum accepted value.
        max: Decimal,
    },

    /// Tariff data would produce a meaningless number (zero divisor, non-positive cost).
    #[error("Arithmetic guard tripped for '{rate_id}': {message}")]
    ArithmeticGuard {
        /// The weight range the guard tripped on.
        rate_id: String,
        /// A description of the offending data.
        message: String,
    },
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;

impl EngineError {
    /// Returns a stable machine-readable code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            EngineError::ConfigNotFound { .. } | EngineError::ConfigParseError { .. } => {
                "CONFIG_ERROR"
            }
            EngineError::CarrierNotFound { .. } => "CARRIER_NOT_FOUND",
            EngineError::ServiceNotFound { .. } => "SERVICE_NOT_FOUND",
            EngineError::PricingNotFound { .. } => "PRICING_NOT_FOUND",
            EngineError::TariffNotFound { .. } => "TARIFF_NOT_FOUND",
            EngineError::InvalidDiscount { .. } => "INVALID_DISCOUNT",
            EngineError::ArithmeticGuard { .. } => "ARITHMETIC_GUARD",
        }
    }
}
