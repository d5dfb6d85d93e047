//! JSON response conventions shared by every endpoint.
//!
//! User-facing problems (bad interval, missing arguments) are soft
//! errors: an `{"error": ...}` object with HTTP 200, matching what the
//! charting front end expects. Database failures become HTTP 500 with
//! the same object shape.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Soft error: JSON error object, HTTP 200.
pub fn soft_error(message: impl Into<String>) -> Response {
    Json(ErrorBody {
        error: message.into(),
    })
    .into_response()
}

/// The JSON 404 object served for unknown paths and unknown houses.
pub fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorBody {
            error: "Not found".to_string(),
        }),
    )
        .into_response()
}

/// Wrapper that maps any internal failure (in practice: sqlx errors) to
/// an HTTP 500 after logging it.
pub struct ApiError(anyhow::Error);

impl<E> From<E> for ApiError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        ApiError(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self.0, "request failed");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorBody {
                error: "Internal server error".to_string(),
            }),
        )
            .into_response()
    }
}
