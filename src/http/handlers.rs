//! API route handlers.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value;

use crate::http::response::{error_response, DataBody};
use crate::http::server::AppState;

/// Path of the contact-form endpoint.
pub const SEND_PATH: &str = "/public/send_grid/from_my_bulb";

/// `POST /public/send_grid/from_my_bulb`
///
/// Body parsing failures (bad JSON, wrong content type, over the size limit) are answered
/// here with the parser's status and never reach the dispatcher.
pub async fn send_from_my_bulb(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Response {
    let Json(payload) = match payload {
        Ok(payload) => payload,
        Err(rejection) => {
            tracing::debug!(status = %rejection.status(), error = %rejection.body_text(), "Body rejected");
            return error_response(rejection.status(), rejection.body_text());
        }
    };

    match state.dispatcher.dispatch(&payload).await {
        Ok(result) => (
            StatusCode::OK,
            Json(DataBody {
                data: result.status_code,
            }),
        )
            .into_response(),
        Err(e) => e.into_response(),
    }
}
