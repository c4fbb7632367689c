//! Terminal outcomes of a rejected request.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::export::ExportError;
use crate::notes::StoreError;
use crate::routing::RouteError;

/// Why a request was not (successfully) dispatched.
#[derive(Debug, Error)]
pub enum GateError {
    /// The global throttle slot was taken too recently.
    #[error("Slow down")]
    TooManyRequests,

    #[error("Not found: {0}")]
    NotFound(String),

    /// Malformed numeric parameter or unreadable request body.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Request body over the configured size limit.
    #[error("Request body too large")]
    PayloadTooLarge,

    /// Missing, malformed, unknown or mismatched form token. The message never
    /// says which, so it cannot be used to probe ids or secrets.
    #[error("Invalid form token")]
    Unauthorized,

    /// Failure reported by the store, renderer or paste exporter.
    #[error("{0}")]
    Upstream(String),
}

impl GateError {
    pub fn status(&self) -> StatusCode {
        match self {
            GateError::TooManyRequests => StatusCode::TOO_MANY_REQUESTS,
            GateError::NotFound(_) => StatusCode::NOT_FOUND,
            GateError::BadRequest(_) => StatusCode::BAD_REQUEST,
            GateError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            GateError::Unauthorized => StatusCode::FORBIDDEN,
            GateError::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for GateError {
    fn into_response(self) -> Response {
        (self.status(), self.to_string()).into_response()
    }
}

impl From<RouteError> for GateError {
    fn from(err: RouteError) -> Self {
        match err {
            RouteError::NotFound(path) => GateError::NotFound(path),
            RouteError::InvalidId(_) => GateError::BadRequest(err.to_string()),
        }
    }
}

impl From<StoreError> for GateError {
    fn from(err: StoreError) -> Self {
        GateError::Upstream(err.to_string())
    }
}

impl From<ExportError> for GateError {
    fn from(err: ExportError) -> Self {
        GateError::Upstream(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(GateError::TooManyRequests.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(GateError::NotFound("/x".into()).status(), StatusCode::NOT_FOUND);
        assert_eq!(GateError::BadRequest("id".into()).status(), StatusCode::BAD_REQUEST);
        assert_eq!(GateError::Unauthorized.status(), StatusCode::FORBIDDEN);
        assert_eq!(GateError::PayloadTooLarge.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(
            GateError::Upstream("db".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_route_errors_convert() {
        let not_found: GateError = RouteError::NotFound("/nope".into()).into();
        assert!(matches!(not_found, GateError::NotFound(p) if p == "/nope"));

        let invalid: GateError = RouteError::InvalidId("999999999999999999999".into()).into();
        assert!(matches!(invalid, GateError::BadRequest(_)));
    }

    #[test]
    fn test_upstream_keeps_message() {
        let err: GateError = StoreError::NotFound(4).into();
        assert_eq!(err.to_string(), "Note not found: 4");
    }
}
