//! Error handlers
//!
//! Maps gateway errors onto HTTP responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use log::{error, warn};
use serde::Serialize;

use crate::error::types::GatewayError;

/// Structured error payload returned for every failed request.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub kind: &'static str,
    pub message: String,
}

/// Log a gateway error at a level matching its severity
pub fn handle_error(err: &GatewayError) {
    match err {
        GatewayError::IoError(_) | GatewayError::Timeout(_) => error!("Gateway error: {}", err),
        _ => warn!("Request rejected: {}", err),
    }
}

/// Convert error to HTTP status code
pub fn error_to_status(err: &GatewayError) -> StatusCode {
    match err {
        GatewayError::InvalidPath(_) => StatusCode::BAD_REQUEST,
        GatewayError::PathTraversal(_) => StatusCode::BAD_REQUEST,
        GatewayError::NotFound(_) => StatusCode::NOT_FOUND,
        GatewayError::AlreadyExists(_) => StatusCode::CONFLICT,
        GatewayError::NotADirectory(_) => StatusCode::CONFLICT,
        GatewayError::NotAFile(_) => StatusCode::CONFLICT,
        GatewayError::InvalidEncoding(_) => StatusCode::UNPROCESSABLE_ENTITY,
        GatewayError::PermissionDenied(_) => StatusCode::FORBIDDEN,
        GatewayError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
        GatewayError::IoError(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        handle_error(&self);
        let body = ErrorBody {
            kind: self.kind(),
            message: self.to_string(),
        };
        (error_to_status(&self), Json(body)).into_response()
    }
}
