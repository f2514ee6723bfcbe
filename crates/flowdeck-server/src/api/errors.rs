//! Error handling for the Flowdeck Server API
//!
//! This module contains standardized error handling for the API.

use axum::{http::StatusCode, response::IntoResponse, response::Response, Json};
use serde_json::json;

use crate::error::ServerError;

/// Convert a server error into a standardized API error response
pub fn api_error_response(err: &ServerError) -> Response {
    let (status_code, error_code, message) = match err {
        ServerError::NotFound(resource) => (
            StatusCode::NOT_FOUND,
            "ERR_NOT_FOUND",
            format!("{} not found", resource),
        ),
        ServerError::ValidationError(msg) => {
            (StatusCode::BAD_REQUEST, "ERR_VALIDATION_ERROR", msg.clone())
        }
        ServerError::StoreError(msg) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "ERR_STORE_ERROR",
            msg.clone(),
        ),
        ServerError::ConfigError(msg) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "ERR_CONFIG_ERROR",
            msg.clone(),
        ),
        ServerError::InternalError(msg) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "ERR_INTERNAL_SERVER_ERROR",
            msg.clone(),
        ),
    };

    let body = Json(json!({
        "error": message,
        "errorDetails": {
            "errorCode": error_code,
            "errorMessage": message,
        }
    }));

    (status_code, body).into_response()
}
