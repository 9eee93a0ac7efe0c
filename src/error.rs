//! Error taxonomy for the relay and its HTTP mapping.
//!
//! # Design Decisions
//! - Only `AssetNotFound` and `InvalidRequest` are rendered locally
//! - Every other failure becomes a 500 carrying an [`ErrorDetail`] extension;
//!   `http::middleware::errors` decides how much of it the client sees

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Body returned when the font CSS has no TrueType/OpenType source.
pub const NOT_FOUND_BODY: &str = "No resource found";

/// Body returned for 500-class failures in production.
pub const INTERNAL_ERROR_BODY: &str = "Internal Server Error";

/// Errors produced while serving a request.
#[derive(Debug, Error)]
pub enum RelayError {
    /// The upstream CSS declared no legacy font source.
    #[error("No resource found")]
    AssetNotFound,

    /// The inbound request cannot be turned into an upstream request.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// An outbound fetch failed at the transport level or returned 5xx.
    #[error("upstream {url} unavailable: {reason}")]
    UpstreamUnavailable { url: String, reason: String },

    /// A response body could not be buffered.
    #[error("failed to read body: {0}")]
    Body(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl RelayError {
    pub fn upstream(url: impl Into<String>, reason: impl ToString) -> Self {
        Self::UpstreamUnavailable {
            url: url.into(),
            reason: reason.to_string(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            RelayError::AssetNotFound => StatusCode::NOT_FOUND,
            RelayError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            RelayError::UpstreamUnavailable { .. }
            | RelayError::Body(_)
            | RelayError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Failure detail attached to generic 500 responses.
#[derive(Debug, Clone)]
pub struct ErrorDetail(pub String);

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let status = self.status();
        match self {
            RelayError::AssetNotFound => (status, NOT_FOUND_BODY).into_response(),
            RelayError::InvalidRequest(reason) => {
                (status, format!("invalid request: {}", reason)).into_response()
            }
            other => {
                let mut response = (status, INTERNAL_ERROR_BODY).into_response();
                response
                    .extensions_mut()
                    .insert(ErrorDetail(other.to_string()));
                response
            }
        }
    }
}

pub type RelayResult<T> = Result<T, RelayError>;
