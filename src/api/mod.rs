//! HTTP API module for the tariff pricing engine.
//!
//! This module provides the REST endpoints for pricing shipments, expanding
//! rate tables and assembling quotes.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{CalculateRateRequest, QuoteRequest, RateTableRequest};
pub use response::{ApiError, ApiErrorResponse};
pub use state::AppState;
