// JSON error bodies shared by every HTTP route.

use axum::{Json, http::StatusCode, response::IntoResponse, response::Response};

#[derive(Debug, serde::Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// `status` with a `{ "error": message }` body.
pub fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
        .into_response()
}
