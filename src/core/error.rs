//! Typed error handling for the dashboard API
//!
//! Three kinds of failure reach a handler:
//!
//! - client errors (an unknown transaction id, a malformed range under the
//!   strict policy) which map to 4xx with their own message,
//! - [`StorageError`]s which map to 500 with a stable, endpoint-specific
//!   message.
//!
//! [`ConfigError`] is raised while bootstrapping and never reaches a handler.
//!
//! Handlers turn a [`DashboardError`] into an [`ApiError`], which renders the
//! `{success: false, message, error?}` envelope the dashboard expects.
//!
//! # Example
//!
//! ```rust,ignore
//! match executor.find_by_id(id).await {
//!     Ok(record) => Json(record).into_response(),
//!     Err(DashboardError::NotFound { .. }) => { /* 404 */ }
//!     Err(e) => ApiError::from_error(&e, "Failed to fetch transaction", false).into_response(),
//! }
//! ```

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

/// The main error type for dashboard operations
#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    /// No transaction carries the requested id
    ///
    /// `id` is the path segment as sent, so a non-numeric id is reported the
    /// same way as a numeric one without a record.
    #[error("Transaction with id '{id}' not found")]
    NotFound { id: String },

    /// A range parameter did not parse (strict policy only)
    #[error("Invalid {parameter}: {message}")]
    InvalidRange { parameter: String, message: String },

    /// The record store failed
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl DashboardError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            DashboardError::NotFound { .. } => StatusCode::NOT_FOUND,
            DashboardError::InvalidRange { .. } => StatusCode::BAD_REQUEST,
            DashboardError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            DashboardError::NotFound { .. } => "TRANSACTION_NOT_FOUND",
            DashboardError::InvalidRange { .. } => "INVALID_RANGE",
            DashboardError::Storage(e) => e.error_code(),
        }
    }

    /// Whether the caller is at fault
    pub fn is_client_error(&self) -> bool {
        self.status_code().is_client_error()
    }

    /// Message shown to clients for 4xx responses
    fn client_message(&self) -> String {
        match self {
            DashboardError::NotFound { .. } => "Transaction not found".to_string(),
            other => other.to_string(),
        }
    }
}

// =============================================================================
// Storage Errors
// =============================================================================

/// Errors raised by a record store
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// A read failed
    #[error("{backend} query error: {message}")]
    QueryError { backend: String, message: String },
}

impl StorageError {
    /// Wrap a backend failure reported through `anyhow`
    pub fn query(backend: &str, err: anyhow::Error) -> Self {
        StorageError::QueryError {
            backend: backend.to_string(),
            message: format!("{err:#}"),
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            StorageError::QueryError { .. } => "STORAGE_QUERY_ERROR",
        }
    }
}

// =============================================================================
// Config Errors
// =============================================================================

/// Errors raised while loading configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to parse configuration
    #[error("Failed to parse config{}: {message}", .file.as_ref().map(|f| format!(" file '{f}'")).unwrap_or_default())]
    ParseError {
        file: Option<String>,
        message: String,
    },

    /// Invalid value in configuration
    #[error("Invalid value '{value}' for {field}: {message}")]
    InvalidValue {
        field: String,
        value: String,
        message: String,
    },

    /// IO error while reading configuration
    #[error("IO error reading config '{path}': {message}")]
    IoError { path: String, message: String },
}

// =============================================================================
// HTTP envelope
// =============================================================================

/// Body of every failed API response
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub success: bool,
    pub message: String,
    /// Internal detail, only outside production
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// An error ready to be sent to an HTTP client
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub body: ErrorBody,
}

impl ApiError {
    /// Build the response for `err`
    ///
    /// Client errors carry their own message. Server errors carry the stable
    /// `fallback` message, plus the underlying error text when
    /// `expose_details` is set.
    pub fn from_error(err: &DashboardError, fallback: &str, expose_details: bool) -> Self {
        let status = err.status_code();
        let body = if err.is_client_error() {
            ErrorBody {
                success: false,
                message: err.client_message(),
                error: None,
            }
        } else {
            ErrorBody {
                success: false,
                message: fallback.to_string(),
                error: expose_details.then(|| err.to_string()),
            }
        };
        Self { status, body }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

/// A specialized Result type for dashboard operations
pub type DashboardResult<T> = Result<T, DashboardError>;
