//! Server error type and its HTTP mapping.
//!
//! Guard denials and malformed request bodies collapse to one uniform
//! generic 400. The response deliberately does not say which check failed;
//! the specific reason is only logged. Store failures are the only 500s.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use board_core::DenyReason;
use thiserror::Error;
use tracing::{debug, error};

use crate::store::StoreError;

/// Errors surfaced from request handlers.
#[derive(Debug, Error)]
pub enum AppError {
    /// The mutation guard denied the request.
    #[error("mutation denied: {0}")]
    Denied(#[from] DenyReason),

    /// The request body was missing or malformed.
    #[error("malformed request")]
    BadRequest,

    /// Post store failure.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            Self::Denied(reason) => {
                debug!(reason = %reason, "mutation denied");
                generic_bad_request()
            },
            Self::BadRequest => {
                debug!("malformed request body");
                generic_bad_request()
            },
            Self::Store(err) => {
                error!(error = %err, "post store failure");
                (StatusCode::INTERNAL_SERVER_ERROR, "500 internal server error").into_response()
            },
        }
    }
}

/// The one user-visible shape of every client error.
fn generic_bad_request() -> Response {
    (StatusCode::BAD_REQUEST, "400 bad request").into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_deny_reason_maps_to_the_same_status() {
        for reason in [
            DenyReason::MissingToken,
            DenyReason::InvalidOrReplayedToken,
            DenyReason::NotFound,
            DenyReason::Forbidden,
        ] {
            let response = AppError::Denied(reason).into_response();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        }
    }

    #[test]
    fn malformed_body_maps_to_bad_request() {
        let response = AppError::BadRequest.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
