//! Custom error types for the API service

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use common::error::DatabaseError;
use thiserror::Error;
use tracing::error;

use crate::response::ErrorBody;

/// Custom error type for the API service
#[derive(Error, Debug)]
pub enum ApiError {
    /// Bad request with message
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Target row does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// HTTP method not handled by the resource
    #[error("Method not supported")]
    MethodNotAllowed,

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),
}

impl ApiError {
    /// HTTP status code the error is reported with
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::Database(DatabaseError::NotConfigured) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        let body = match self {
            ApiError::BadRequest(msg) | ApiError::NotFound(msg) => ErrorBody::new(msg),
            ApiError::MethodNotAllowed => ErrorBody::new("Method not supported"),
            ApiError::Database(DatabaseError::NotConfigured) => {
                ErrorBody::new("Database not configured")
                    .with_details("Set DATABASE_URL or NETLIFY_DATABASE_URL")
            }
            ApiError::Database(e @ DatabaseError::Schema(_)) => {
                error!("Schema initialization failed: {}", e);
                ErrorBody::new("Database schema initialization failed").with_details(e.cause())
            }
            ApiError::Database(e) => {
                error!("API error: {}", e);
                ErrorBody::new(e.cause())
            }
        };

        (status, Json(body)).into_response()
    }
}

/// Type alias for API results
pub type ApiResult<T> = Result<T, ApiError>;
