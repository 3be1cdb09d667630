//! API error type rendered as a `{message}` body

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::domain::DomainError;

pub const MISSING_DATA: &str = "Missing data";
pub const INVALID_SORT_BY: &str = "Invalid sort_by parameter";
pub const INTERNAL_ERROR: &str = "Internal server error";

/// Body of every error response, and of message-only success responses
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// API error with status code
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub response: MessageResponse,
}

impl ApiError {
    /// Create a new API error
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            response: MessageResponse {
                message: message.into(),
            },
        }
    }

    /// Bad request error
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    /// Not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    /// Internal server error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    /// Service unavailable
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(StatusCode::SERVICE_UNAVAILABLE, message)
    }

    pub fn message(&self) -> &str {
        &self.response.message
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.response)).into_response()
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::MissingData => Self::bad_request(MISSING_DATA),
            DomainError::Validation { message, .. } => Self::bad_request(message),
            DomainError::DuplicateKey { message } => Self::bad_request(message),
            DomainError::NotFound { message } => Self::not_found(message),
            DomainError::InvalidSortKey { .. } => Self::bad_request(INVALID_SORT_BY),
            err @ (DomainError::Configuration { .. } | DomainError::Storage { .. }) => {
                error!(error = %err, "Request failed on infrastructure error");
                Self::internal(INTERNAL_ERROR)
            }
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.status, self.response.message)
    }
}

impl std::error::Error for ApiError {}
