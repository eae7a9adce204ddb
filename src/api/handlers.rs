//! HTTP request handlers for the tariff pricing API.
//!
//! This module contains the handler functions for all API endpoints.

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
};
use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculation::{
    RateQuery, TableQuery, build_quote, calculate_rate, calculate_rate_table,
};

use super::request::{CalculateRateRequest, QuoteRequest, RateTableRequest};
use super::response::{ApiError, ApiErrorResponse};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/rates/calculate", post(calculate_rate_handler))
        .route("/rates/table", post(rate_table_handler))
        .route("/quotes", post(quote_handler))
        .with_state(state)
}

/// Maps a JSON extraction failure to a 400 response.
fn rejection_response(correlation_id: Uuid, rejection: JsonRejection) -> ApiErrorResponse {
    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            let body_text = err.body_text();
            warn!(
                correlation_id = %correlation_id,
                error = %body_text,
                "JSON data error"
            );
            if body_text.contains("missing field") {
                ApiError::validation_error(body_text)
            } else {
                ApiError::malformed_json(body_text)
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "JSON syntax error"
            );
            ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
        }
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
        }
        _ => ApiError::malformed_json("Failed to parse request body"),
    };
    ApiErrorResponse::bad_request(error)
}

/// Handler for POST /rates/calculate.
///
/// Prices one shipment and returns the rate with its audit trace.
async fn calculate_rate_handler(
    State(state): State<AppState>,
    payload: Result<Json<CalculateRateRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing rate request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(correlation_id, rejection).into_response(),
    };

    let now = request.as_of.unwrap_or_else(Utc::now);
    let query: RateQuery = request.into();

    match calculate_rate(state.catalogue(), &query, now) {
        Ok(result) => {
            info!(
                correlation_id = %correlation_id,
                carrier_id = %query.carrier_id,
                service_code = %query.service_code,
                rate_id = %result.rate.rate_id,
                final_price = %result.rate.final_price,
                warnings = result.audit_trace.warnings.len(),
                duration_us = result.audit_trace.duration_us,
                "Rate calculated"
            );
            (StatusCode::OK, Json(result)).into_response()
        }
        Err(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "Rate calculation failed"
            );
            ApiErrorResponse::from(err).into_response()
        }
    }
}

/// Handler for POST /rates/table.
///
/// Prices every weight range of a service. Rows that cannot be priced carry
/// an error instead of a rate.
async fn rate_table_handler(
    State(state): State<AppState>,
    payload: Result<Json<RateTableRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing rate table request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(correlation_id, rejection).into_response(),
    };

    let now = request.as_of.unwrap_or_else(Utc::now);
    let query: TableQuery = request.into();

    match calculate_rate_table(state.catalogue(), &query, now) {
        Ok(table) => {
            let unavailable = table.rows.iter().filter(|r| !r.is_available()).count();
            info!(
                correlation_id = %correlation_id,
                carrier_id = %table.carrier_id,
                service_code = %table.service_code,
                rows = table.rows.len(),
                unavailable,
                "Rate table calculated"
            );
            (StatusCode::OK, Json(table)).into_response()
        }
        Err(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "Rate table calculation failed"
            );
            ApiErrorResponse::from(err).into_response()
        }
    }
}

/// Handler for POST /quotes.
///
/// Aggregates finalized rates into a quote. Rates are not recomputed.
async fn quote_handler(payload: Result<Json<QuoteRequest>, JsonRejection>) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing quote request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(correlation_id, rejection).into_response(),
    };

    if request.lines.is_empty() {
        warn!(correlation_id = %correlation_id, "Quote without rates");
        return ApiErrorResponse::bad_request(ApiError::validation_error(
            "A quote needs at least one rate",
        ))
        .into_response();
    }

    let quote = build_quote(
        request.lines,
        request.locale,
        request.customer_name,
        Utc::now(),
    );
    info!(
        correlation_id = %correlation_id,
        quote_id = %quote.quote_id,
        lines = quote.totals.line_count,
        total_final_price = %quote.totals.total_final_price,
        total_margin = %quote.totals.total_margin,
        "Quote assembled"
    );
    (StatusCode::OK, Json(quote)).into_response()
}
