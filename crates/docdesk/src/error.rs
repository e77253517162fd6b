//! Error types for the document desk

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Result type alias for docdesk operations
pub type Result<T> = std::result::Result<T, Error>;

/// Document desk errors
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Document not found in storage
    #[error("Document not found: {0}")]
    DocumentNotFound(String),

    /// Input exists but does not have the expected row/column shape
    #[error("Malformed input '{filename}': {message}")]
    MalformedInput { filename: String, message: String },

    /// File parsing error (per-document extraction faults)
    #[error("Failed to parse file '{filename}': {message}")]
    FileParse { filename: String, message: String },

    /// Unsupported file type
    #[error("Unsupported file type: {0}")]
    UnsupportedFileType(String),

    /// Filename rejected by the storage gateway
    #[error("Invalid filename: {0}")]
    InvalidFilename(String),

    /// Multipart upload body could not be read
    #[error("Upload rejected: {message}")]
    Upload { status: StatusCode, message: String },

    /// Writing the merge artifact failed
    #[error("Export error: {0}")]
    Export(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML config error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a malformed input error
    pub fn malformed(filename: impl Into<String>, message: impl Into<String>) -> Self {
        Self::MalformedInput {
            filename: filename.into(),
            message: message.into(),
        }
    }

    /// Create a file parse error
    pub fn file_parse(filename: impl Into<String>, message: impl Into<String>) -> Self {
        Self::FileParse {
            filename: filename.into(),
            message: message.into(),
        }
    }

    /// Create an export error
    pub fn export(message: impl Into<String>) -> Self {
        Self::Export(message.into())
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Short machine-readable error type used in API responses
    pub fn kind(&self) -> &'static str {
        match self {
            Error::Config(_) => "config_error",
            Error::DocumentNotFound(_) => "not_found",
            Error::MalformedInput { .. } => "malformed_input",
            Error::FileParse { .. } => "parse_error",
            Error::UnsupportedFileType(_) => "unsupported_type",
            Error::InvalidFilename(_) => "invalid_filename",
            Error::Upload { .. } => "upload_error",
            Error::Export(_) => "export_error",
            Error::Io(_) => "io_error",
            Error::Json(_) => "json_error",
            Error::Toml(_) => "config_error",
            Error::Internal(_) => "internal_error",
        }
    }

    /// HTTP status for this error
    pub fn status(&self) -> StatusCode {
        match self {
            Error::DocumentNotFound(_) => StatusCode::NOT_FOUND,
            Error::MalformedInput { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            Error::UnsupportedFileType(_) | Error::InvalidFilename(_) => StatusCode::BAD_REQUEST,
            Error::Json(_) => StatusCode::BAD_REQUEST,
            Error::Upload { status, .. } => *status,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        Error::Export(err.to_string())
    }
}

impl From<axum::extract::multipart::MultipartError> for Error {
    fn from(err: axum::extract::multipart::MultipartError) -> Self {
        Error::Upload {
            status: err.status(),
            message: err.body_text(),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        }

        let body = Json(json!({
            "error": self.kind(),
            "message": self.to_string(),
        }));

        (status, body).into_response()
    }
}
