use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

/// Errors surfaced to the caller of the relay.
///
/// Both variants are fatal for the current request. The relay performs no
/// local recovery or retry; any retry policy belongs to the caller.
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    /// The inbound content type was not `application/json`.
    #[error("unsupported content type {content_type}, only application/json is accepted")]
    UnsupportedMediaType { content_type: String },

    /// The backend returned a non-200 status, or could not be reached. The
    /// message carries the decoded backend response body.
    #[error("{message}")]
    Backend { message: String },
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let status = match self {
            RelayError::UnsupportedMediaType { .. } => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            RelayError::Backend { .. } => StatusCode::BAD_GATEWAY,
        };
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
