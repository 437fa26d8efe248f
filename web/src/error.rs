//! Error types for the web layer.
//!
//! - [`TranslateError`]: rendering a result envelope failed. Every variant is
//!   a defect (programming or configuration bug), never an expected outcome.
//! - [`ConfigError`]: options handed over by the host are unusable.
//! - [`AppError`]: the HTTP-facing error, implementing Axum's `IntoResponse`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use result_bridge_core::NotificationEffect;
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Rendering a result envelope failed.
#[derive(Debug, Error)]
pub enum TranslateError {
    /// The winning notification effect has no status in the active policy.
    #[error("no status mapped for notification effect {0}")]
    UnsupportedEffect(NotificationEffect),

    /// The response body could not be serialized.
    #[error("failed to serialize response body: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A computed header value is not valid HTTP.
    #[error("invalid value for header {header}: {source}")]
    InvalidHeader {
        /// Header being written
        header: &'static str,
        /// Underlying error
        #[source]
        source: http::header::InvalidHeaderValue,
    },

    /// A file result could not be read.
    #[error("failed to read file {}: {source}", .path.display())]
    File {
        /// Path that was read
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// A file envelope carried a list or a page instead of one file.
    #[error("file results must carry a single file")]
    UnsupportedFileOutput,
}

impl TranslateError {
    /// Short machine-readable label, used for error codes and metrics.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::UnsupportedEffect(_) => "UNSUPPORTED_EFFECT",
            Self::Serialization(_) => "SERIALIZATION_ERROR",
            Self::InvalidHeader { .. } => "INVALID_HEADER",
            Self::File { .. } => "FILE_ERROR",
            Self::UnsupportedFileOutput => "UNSUPPORTED_FILE_OUTPUT",
        }
    }
}

/// Options supplied by the host are unusable.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The correlation header name is not a valid HTTP header name.
    #[error("invalid correlation header name: {0:?}")]
    InvalidHeaderName(String),

    /// The page query parameter name is empty.
    #[error("page parameter name must not be empty")]
    EmptyPageParameter,
}

/// Application error type for web handlers.
///
/// Renders as a JSON `{ "code", "message" }` body. Server errors are logged
/// with their source before the response is produced.
///
/// # Examples
///
/// ```ignore
/// async fn handler() -> Result<Json<Data>, AppError> {
///     let data = load().await.map_err(anyhow::Error::from)?;
///     Ok(Json(data))
/// }
/// ```
#[derive(Debug)]
pub struct AppError {
    /// HTTP status code
    status: StatusCode,
    /// Error message (user-facing)
    message: String,
    /// Error code (for client error handling)
    code: String,
    /// Internal error (for logging, not exposed to client)
    source: Option<anyhow::Error>,
}

impl AppError {
    /// Create a new application error.
    #[must_use]
    pub const fn new(status: StatusCode, message: String, code: String) -> Self {
        Self {
            status,
            message,
            code,
            source: None,
        }
    }

    /// Create a new error with a source error.
    #[must_use]
    pub fn with_source(mut self, source: anyhow::Error) -> Self {
        self.source = Some(source);
        self
    }

    /// Create a 500 Internal Server Error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            message.into(),
            "INTERNAL_SERVER_ERROR".to_string(),
        )
    }

    /// HTTP status of this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// Machine-readable error code.
    #[must_use]
    pub fn code(&self) -> &str {
        &self.code
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Error response body (JSON).
#[derive(Debug, Serialize)]
struct ErrorResponse {
    /// Error code (for client error handling).
    code: String,
    /// Human-readable error message.
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            if let Some(source) = &self.source {
                tracing::error!(
                    status = %self.status,
                    code = %self.code,
                    message = %self.message,
                    error = %source,
                    "Internal server error"
                );
            } else {
                tracing::error!(
                    status = %self.status,
                    code = %self.code,
                    message = %self.message,
                    "Internal server error"
                );
            }
        }

        let body = ErrorResponse {
            code: self.code,
            message: self.message,
        };

        (self.status, Json(body)).into_response()
    }
}

/// Translation failures are defects: always a 500 carrying the failure label.
impl From<TranslateError> for AppError {
    fn from(err: TranslateError) -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            err.to_string(),
            err.kind().to_string(),
        )
        .with_source(err.into())
    }
}

/// Convert `anyhow::Error` to `AppError`.
impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self::internal("An internal error occurred").with_source(err)
    }
}
