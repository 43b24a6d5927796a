//! Request-scoped failures and their status mapping.

use axum::http::StatusCode;
use thiserror::Error;

/// The request body could not be consumed.
#[derive(Debug, Error)]
pub enum DrainError {
    #[error("failed to read request body: {0}")]
    Read(#[from] axum::Error),

    #[error("request body exceeds {limit} bytes")]
    TooLarge { limit: u64 },

    #[error("request body not received within {secs}s")]
    Timeout { secs: u64 },
}

/// Terminates a request before its normal reply.
#[derive(Debug, Error)]
pub enum RequestError {
    #[error(transparent)]
    Drain(#[from] DrainError),

    #[error("storage backend is not healthy")]
    BackendUnhealthy,
}

impl RequestError {
    pub fn status(&self) -> StatusCode {
        match self {
            RequestError::Drain(DrainError::Read(_)) => StatusCode::BAD_REQUEST,
            RequestError::Drain(DrainError::TooLarge { .. }) => StatusCode::PAYLOAD_TOO_LARGE,
            RequestError::Drain(DrainError::Timeout { .. }) => StatusCode::REQUEST_TIMEOUT,
            RequestError::BackendUnhealthy => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}
