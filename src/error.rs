//! Error types for the media asset server.
//!
//! This module defines a unified error handling system using `thiserror`.
//! All errors are converted to `{"error": "<message>"}` responses.
//!
//! # Error Categories
//!
//! - **Client errors (4xx)**: missing upload field, rejected filename,
//!   malformed multipart body, oversized body
//! - **Server errors (5xx)**: failed filesystem operations. The message sent
//!   to the client is fixed per operation; the underlying I/O error is only
//!   logged.
//!
//! # Example
//!
//! ```rust,ignore
//! use crate::error::{AppError, Result, StorageOp};
//!
//! async fn remove(kind: AssetKind, path: &Path) -> Result<()> {
//!     tokio::fs::remove_file(path)
//!         .await
//!         .map_err(|e| AppError::storage(kind, StorageOp::Delete, e))
//! }
//! ```

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use crate::models::AssetKind;

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;

/// Filesystem operation performed on behalf of a request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageOp {
    /// Reading a storage directory
    List,
    /// Writing an uploaded file
    Save,
    /// Removing a file
    Delete,
}

impl StorageOp {
    /// Fixed client-facing message for a failure of this operation
    pub fn failure_message(&self, kind: &AssetKind) -> String {
        match self {
            Self::List => format!("Failed to read the {} directory", kind.plural()),
            Self::Save => format!("Failed to save the {}", kind.noun()),
            Self::Delete => format!("Failed to delete the {}", kind.noun()),
        }
    }
}

/// Application error type
///
/// Each variant is mapped to an appropriate HTTP status code.
#[derive(Debug, Error)]
pub enum AppError {
    // -------------------------------------------------------------------------
    // Client Errors (4xx)
    // -------------------------------------------------------------------------
    /// The upload carried no file in the expected form field
    #[error("{} file is required", title(.0.noun()))]
    MissingFile(AssetKind),

    /// Filename unusable as a single path component
    #[error("Invalid filename: {0}")]
    InvalidFilename(String),

    /// Malformed request
    #[error("Validation error: {0}")]
    Validation(String),

    /// Request payload too large
    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    // -------------------------------------------------------------------------
    // Server Errors (5xx)
    // -------------------------------------------------------------------------
    /// A filesystem operation on an asset directory failed
    #[error("{}: {source}", .op.failure_message(.kind))]
    Storage {
        kind: AssetKind,
        op: StorageOp,
        #[source]
        source: std::io::Error,
    },

    /// I/O error outside of a request (startup, health checks)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

fn title(noun: &str) -> String {
    let mut chars = noun.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

impl AppError {
    // -------------------------------------------------------------------------
    // Convenience constructors
    // -------------------------------------------------------------------------

    /// Create a missing upload error
    pub fn missing_file(kind: AssetKind) -> Self {
        Self::MissingFile(kind)
    }

    /// Create an invalid filename error
    pub fn invalid_filename<S: Into<String>>(msg: S) -> Self {
        Self::InvalidFilename(msg.into())
    }

    /// Create a validation error
    pub fn validation<S: Into<String>>(msg: S) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a payload too large error
    pub fn payload_too_large<S: Into<String>>(msg: S) -> Self {
        Self::PayloadTooLarge(msg.into())
    }

    /// Create a storage error for a failed filesystem operation
    pub fn storage(kind: AssetKind, op: StorageOp, source: std::io::Error) -> Self {
        Self::Storage { kind, op, source }
    }

    /// Create a config error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            // 4xx Client Errors
            Self::MissingFile(_) => StatusCode::BAD_REQUEST,
            Self::InvalidFilename(_) => StatusCode::BAD_REQUEST,
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,

            // 5xx Server Errors
            Self::Storage { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Check if this is a client error (4xx)
    pub fn is_client_error(&self) -> bool {
        self.status_code().is_client_error()
    }

    /// Check if this is a server error (5xx)
    pub fn is_server_error(&self) -> bool {
        self.status_code().is_server_error()
    }

    /// Message sent to the client.
    ///
    /// Server errors never expose the underlying cause.
    pub fn client_message(&self) -> String {
        match self {
            Self::Storage { kind, op, .. } => op.failure_message(kind),
            _ if self.is_server_error() => {
                "An internal error occurred. Please try again later.".to_string()
            }
            _ => self.to_string(),
        }
    }
}

/// Error response body sent to clients
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if self.is_server_error() {
            tracing::error!(error = %self, "Server error occurred");
        } else {
            tracing::debug!(error = %self, "Client error occurred");
        }

        let body = ErrorResponse::new(self.client_message());

        (status, Json(body)).into_response()
    }
}

// -------------------------------------------------------------------------
// Error conversions from external crates
// -------------------------------------------------------------------------

impl From<axum::extract::multipart::MultipartError> for AppError {
    fn from(err: axum::extract::multipart::MultipartError) -> Self {
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            Self::payload_too_large(err.body_text())
        } else {
            Self::validation(format!("Invalid multipart data: {}", err.body_text()))
        }
    }
}
