//! HTTP error responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use bedrock_relay_error::{InvocationErrorKind, RelayError, RelayErrorKind};
use serde_json::json;
use tracing::{error, warn};

/// A failure raised before the response body starts.
///
/// Rendered as `{"error": {"kind": ..., "message": ...}}`. Source locations
/// are logged but not sent to the client.
#[derive(Debug)]
pub enum ApiError {
    /// A relay operation failed.
    Relay(RelayError),
    /// The request was refused before reaching a handler body, e.g. too
    /// large or not form-encoded.
    Rejected {
        /// Status chosen by the extractor
        status: StatusCode,
        /// Extractor's explanation
        message: String,
    },
}

impl ApiError {
    /// Wraps an extractor rejection.
    pub fn rejected(status: StatusCode, message: impl Into<String>) -> Self {
        ApiError::Rejected {
            status,
            message: message.into(),
        }
    }

    /// Status code and kind label for the response.
    pub fn status(&self) -> (StatusCode, &'static str) {
        let kind = match self {
            ApiError::Relay(e) => e.kind(),
            ApiError::Rejected { status, .. } => return (*status, "request"),
        };
        match kind {
            RelayErrorKind::Decode(_) => (StatusCode::BAD_REQUEST, "decode"),
            RelayErrorKind::Invocation(e) if e.kind == InvocationErrorKind::Timeout => {
                (StatusCode::GATEWAY_TIMEOUT, "invocation")
            }
            RelayErrorKind::Invocation(_) => (StatusCode::BAD_GATEWAY, "invocation"),
            RelayErrorKind::Write(_) => (StatusCode::INTERNAL_SERVER_ERROR, "write"),
            RelayErrorKind::Config(_) => (StatusCode::INTERNAL_SERVER_ERROR, "config"),
            RelayErrorKind::Search(_) => (StatusCode::BAD_GATEWAY, "search"),
        }
    }

    fn message(&self) -> &str {
        let kind = match self {
            ApiError::Relay(e) => e.kind(),
            ApiError::Rejected { message, .. } => return message,
        };
        match kind {
            RelayErrorKind::Decode(e) => &e.message,
            RelayErrorKind::Invocation(e) => &e.message,
            RelayErrorKind::Write(e) => &e.message,
            RelayErrorKind::Config(e) => &e.message,
            RelayErrorKind::Search(e) => &e.message,
        }
    }
}

impl<T> From<T> for ApiError
where
    T: Into<RelayError>,
{
    fn from(err: T) -> Self {
        ApiError::Relay(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, kind) = self.status();
        if status.is_server_error() {
            error!(status = %status, error = ?self, "Request failed");
        } else {
            warn!(status = %status, kind, message = self.message(), "Request rejected");
        }
        let body = json!({
            "error": {
                "kind": kind,
                "message": self.message(),
            }
        });
        (status, Json(body)).into_response()
    }
}
