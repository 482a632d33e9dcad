//! API error types with HTTP response mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::checkout::CheckoutError;
use crate::status::InvalidStatus;

/// API-level error type that maps to HTTP responses.
#[derive(Debug)]
pub enum ApiError {
    /// Resource not found.
    NotFound(String),
    /// Bad request from the client.
    BadRequest(String),
    /// Checkout validation rejected the order.
    Checkout(CheckoutError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Checkout(err) => checkout_error_to_response(err),
        };

        let body = serde_json::json!({ "error": message });
        (status, axum::Json(body)).into_response()
    }
}

fn checkout_error_to_response(err: CheckoutError) -> (StatusCode, String) {
    match &err {
        // The catalog gave no answer, so nothing is wrong with the request
        // itself. A retry may well succeed.
        CheckoutError::CatalogUnavailable(reason) => {
            tracing::error!(%reason, "catalog unavailable during checkout");
            (StatusCode::SERVICE_UNAVAILABLE, err.to_string())
        }
        // Everything else is a definitive verdict on the submitted order.
        CheckoutError::ProductNotFound { .. }
        | CheckoutError::InsufficientStock { .. }
        | CheckoutError::InvalidQuantity { .. }
        | CheckoutError::EmptyOrder => (StatusCode::BAD_REQUEST, err.to_string()),
    }
}

impl From<CheckoutError> for ApiError {
    fn from(err: CheckoutError) -> Self {
        ApiError::Checkout(err)
    }
}

impl From<InvalidStatus> for ApiError {
    fn from(err: InvalidStatus) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}
