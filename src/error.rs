//! Error types for da-app-link

use std::time::Duration;
use thiserror::Error;

/// Result type alias for da-app-link operations
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type for the application
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// API-related errors
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Authentication failed. Check your Veracode API credentials.")]
    Unauthorized,

    #[error("Access denied. Your API credentials lack the permissions for this request.")]
    Forbidden,

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Rate limit exceeded. Retry after {0:?}")]
    RateLimit(Duration),

    #[error("Server error: {0}")]
    ServerError(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Failed to sign request: {0}")]
    Signing(String),

    #[error("Invalid API response: {0}")]
    InvalidResponse(String),

    #[error("Unexpected status {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Network("Request timed out".to_string())
        } else if err.is_connect() {
            ApiError::Network("Failed to connect to API".to_string())
        } else {
            ApiError::Network(err.to_string())
        }
    }
}

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(
        "Veracode API credentials not found. Set VERACODE_API_KEY_ID and VERACODE_API_KEY_SECRET or create ~/.veracode/credentials."
    )]
    MissingCredentials,

    #[error("Credentials file not found: {0}")]
    NotFound(String),

    #[error("Profile '{0}' not found in credentials file")]
    ProfileNotFound(String),

    #[error("Failed to parse credentials file: {0}")]
    ParseError(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
