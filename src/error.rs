//! Typed errors and HTTP mapping.

use crate::response::{Envelope, Meta};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid value for {key}: '{value}'")]
    Invalid { key: &'static str, value: String },
}

/// Failures raised by the database gateway. Messages carry the driver text verbatim.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DbError {
    #[error("Error connecting to the database: {0}")]
    Connect(String),
    #[error("Error executing query: {0}")]
    Query(String),
    #[error("Error decoding row: {0}")]
    Decode(String),
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid {0} ID")]
    InvalidId(&'static str),
    #[error("{}", .0.join(", "))]
    Validation(Vec<String>),
    #[error("{0} already exists")]
    Duplicate(&'static str),
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("{0}")]
    BadRequest(String),
    #[error(transparent)]
    Database(#[from] DbError),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidId(_)
            | AppError::Validation(_)
            | AppError::Duplicate(_)
            | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Attach the request metadata so the error can be rendered as an envelope.
    pub fn with_meta(self, meta: Meta) -> ApiError {
        ApiError { error: self, meta }
    }
}

/// An [`AppError`] bound to the request it failed, rendered as `{data: null, error, meta}`.
#[derive(Debug)]
pub struct ApiError {
    pub error: AppError,
    pub meta: Meta,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.error.status();
        if status.is_server_error() {
            tracing::error!(method = %self.meta.method, url = %self.meta.url, error = %self.error, "request failed");
        } else {
            tracing::debug!(method = %self.meta.method, url = %self.meta.url, error = %self.error, "request rejected");
        }
        let body: Envelope<()> = Envelope::error(self.error.to_string(), self.meta);
        (status, Json(body)).into_response()
    }
}
