//! Error taxonomy for the HTTP API.
//!
//! Every error reaching a handler boundary is converted into a status code
//! plus a JSON `{"error": ...}` body. Nothing is retried; persistence
//! failures surface as 500 rather than being dropped.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Errors produced by the ticket API.
#[derive(Error, Debug)]
pub enum ApiError {
    /// A required field was missing or blank.
    #[error("{0}")]
    Validation(String),

    /// Username/password pair did not match any account.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// The session lacks the role required for this endpoint.
    #[error("Unauthorized")]
    Forbidden,

    /// No ticket with the requested id.
    #[error("Ticket not found")]
    TicketNotFound,

    /// Backing file could not be read or written.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Maps the error variant to its HTTP status code.
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::TicketNotFound => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %self, "Request failed");
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

impl From<crate::store::StoreError> for ApiError {
    fn from(err: crate::store::StoreError) -> Self {
        use crate::store::StoreError;
        match err {
            StoreError::MissingField(field) => {
                ApiError::Validation(format!("Field '{field}' is required"))
            }
            StoreError::NotFound(_) => ApiError::TicketNotFound,
            StoreError::Io(e) => ApiError::Internal(e.to_string()),
            StoreError::Corrupt(e) => ApiError::Internal(e.to_string()),
        }
    }
}
