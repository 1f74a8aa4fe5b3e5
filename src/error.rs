//! Error types for the drive_report crate.

use thiserror::Error;

/// Errors that can occur while fetching or enriching file metadata.
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Failed to read credentials file: {0}")]
    CredentialsFileError(#[from] std::io::Error),

    #[error("Failed to parse credentials JSON: {0}")]
    CredentialsParseError(#[from] serde_json::Error),

    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("API error ({status}): {message}")]
    ApiError { status: u16, message: String },

    #[error("JWT encoding error: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),

    #[error("Token refresh failed: {0}")]
    TokenRefreshError(String),
}

/// Result type alias for ReportError.
pub type Result<T> = std::result::Result<T, ReportError>;
