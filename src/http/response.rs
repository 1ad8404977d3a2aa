//! Response shapes and error mapping.
//!
//! # Responsibilities
//! - JSON bodies for success (`{data}`) and failure (`{error}`)
//! - Map dispatch errors to status codes without leaking provider detail
//!
//! # Design Decisions
//! - Validation errors surface their message; gateway errors never do
//! - Full gateway detail is logged by the dispatcher, not here

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::dispatch::DispatchError;

pub const MISSING_FIELDS: &str = "Missing required fields";
pub const INTERNAL_ERROR: &str = "Internal server error";
pub const NOT_FOUND: &str = "Not found";

/// Successful API payload.
#[derive(Debug, Serialize)]
pub struct DataBody<T> {
    pub data: T,
}

/// Failed API payload.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

/// `status` with `{"error": message}`.
pub fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorBody {
            error: message.into(),
        }),
    )
        .into_response()
}

impl IntoResponse for DispatchError {
    fn into_response(self) -> Response {
        match self {
            DispatchError::InvalidForm(_) => error_response(StatusCode::BAD_REQUEST, MISSING_FIELDS),
            DispatchError::Gateway(_) => {
                error_response(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR)
            }
        }
    }
}

/// Fallback for unknown paths.
pub async fn not_found() -> Response {
    error_response(StatusCode::NOT_FOUND, NOT_FOUND)
}
