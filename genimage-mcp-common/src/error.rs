//! Error types for the common library.
//!
//! This module provides the error hierarchy shared by the genimage server,
//! built on `thiserror`.
//!
//! # Error Categories
//!
//! - `ConfigError`: Missing or invalid configuration (fatal at startup)
//! - `Error::Api`: Upstream request failed or returned a non-success status
//! - `Error::NoImage`: Upstream answered but produced no usable image
//! - `Error::Decode`: Returned bytes are not valid base64 or not a valid image
//! - `Error::Storage`: Directory creation or file write failed
//! - `Error::Validation`: Tool parameters rejected before any upstream call

use std::path::PathBuf;
use thiserror::Error;

/// Unified error type for the genimage server.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration errors (missing env vars, invalid values)
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Upstream API errors with endpoint and HTTP status context.
    ///
    /// A status code of 0 means the request never produced a response
    /// (connection refused, DNS failure, body read error).
    #[error("API error for {endpoint} (HTTP {status_code}): {message}")]
    Api {
        /// The API endpoint that was called
        endpoint: String,
        /// HTTP status code returned by the API
        status_code: u16,
        /// Error message from the API or describing the failure
        message: String,
    },

    /// The upstream call succeeded but yielded no image payload
    #[error("No image generated: {0}")]
    NoImage(String),

    /// Image payload could not be decoded
    #[error("Failed to decode image: {0}")]
    Decode(String),

    /// Filesystem errors while preparing the destination or writing the file
    #[error("Failed to write {}: {source}", path.display())]
    Storage {
        /// Path that was being created or written
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Input validation errors
    #[error("Validation error: {0}")]
    Validation(String),
}

impl Error {
    /// Create a new API error with endpoint, status code, and message.
    ///
    /// # Example
    ///
    /// ```
    /// use genimage_mcp_common::error::Error;
    ///
    /// let err = Error::api(
    ///     "https://generativelanguage.googleapis.com/v1beta/models/m:predict",
    ///     500,
    ///     "Internal server error"
    /// );
    /// assert!(err.to_string().contains("generativelanguage"));
    /// assert!(err.to_string().contains("500"));
    /// ```
    pub fn api(endpoint: impl Into<String>, status_code: u16, message: impl Into<String>) -> Self {
        Error::Api {
            endpoint: endpoint.into(),
            status_code,
            message: message.into(),
        }
    }

    /// Create a new "no image produced" error.
    pub fn no_image(message: impl Into<String>) -> Self {
        Error::NoImage(message.into())
    }

    /// Create a new decode error.
    ///
    /// # Example
    ///
    /// ```
    /// use genimage_mcp_common::error::Error;
    ///
    /// let err = Error::decode("unsupported image format");
    /// assert!(err.to_string().contains("unsupported image format"));
    /// ```
    pub fn decode(message: impl Into<String>) -> Self {
        Error::Decode(message.into())
    }

    /// Create a new storage error for the given path.
    pub fn storage(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Storage {
            path: path.into(),
            source,
        }
    }

    /// Create a new validation error.
    ///
    /// # Example
    ///
    /// ```
    /// use genimage_mcp_common::error::Error;
    ///
    /// let err = Error::validation("prompt cannot be empty");
    /// assert!(err.to_string().contains("prompt cannot be empty"));
    /// ```
    pub fn validation(message: impl Into<String>) -> Self {
        Error::Validation(message.into())
    }

    /// Stable category label used in tool results and logs.
    pub fn category(&self) -> &'static str {
        match self {
            Error::Config(_) => "configuration",
            Error::Api { .. } | Error::NoImage(_) => "upstream",
            Error::Decode(_) => "decode",
            Error::Storage { .. } => "storage",
            Error::Validation(_) => "validation",
        }
    }
}

/// Configuration errors.
///
/// These errors occur when loading or validating configuration from
/// environment variables, or when a call needs a setting that was never
/// configured.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required environment variable is not set
    #[error("Required environment variable {0} is not set")]
    MissingEnvVar(String),

    /// An environment variable has an invalid value
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),

    /// No destination directory was supplied and no default is configured
    #[error("No destination directory given and {0} is not set")]
    NoDestination(String),
}

impl ConfigError {
    /// Create a new missing environment variable error.
    pub fn missing_env_var(name: impl Into<String>) -> Self {
        ConfigError::MissingEnvVar(name.into())
    }

    /// Create a new invalid value error.
    pub fn invalid_value(name: impl Into<String>, reason: impl Into<String>) -> Self {
        ConfigError::InvalidValue(name.into(), reason.into())
    }
}

/// Result type alias using the unified Error type.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_includes_endpoint_and_status() {
        let err = Error::api("https://generativelanguage.googleapis.com/v1beta", 500, "Internal error");
        let msg = err.to_string();
        assert!(msg.contains("generativelanguage.googleapis.com"), "Should contain endpoint");
        assert!(msg.contains("500"), "Should contain status code");
        assert!(msg.contains("Internal error"), "Should contain message");
    }

    #[test]
    fn test_config_error_includes_var_name() {
        let err = ConfigError::missing_env_var("GEMINI_API_KEY");
        let msg = err.to_string();
        assert!(msg.contains("GEMINI_API_KEY"), "Should contain variable name");
    }

    #[test]
    fn test_error_from_config_error() {
        let config_err = ConfigError::missing_env_var("TEST_VAR");
        let err: Error = config_err.into();
        assert!(matches!(err, Error::Config(_)));
        assert_eq!(err.category(), "configuration");
    }

    #[test]
    fn test_storage_error_includes_path() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = Error::storage("/readonly/out.png", io_err);
        let msg = err.to_string();
        assert!(msg.contains("/readonly/out.png"));
        assert!(msg.contains("denied"));
        assert_eq!(err.category(), "storage");
    }

    #[test]
    fn test_no_image_is_upstream() {
        let err = Error::no_image("response contained only text");
        assert!(err.to_string().contains("No image generated"));
        assert_eq!(err.category(), "upstream");
    }

    #[test]
    fn test_decode_error() {
        let err = Error::decode("bad magic bytes");
        assert!(err.to_string().contains("bad magic bytes"));
        assert_eq!(err.category(), "decode");
    }

    #[test]
    fn test_validation_error() {
        let err = Error::validation("prompt too long");
        let msg = err.to_string();
        assert!(msg.contains("Validation"), "Should mention validation");
        assert!(msg.contains("prompt too long"), "Should contain message");
    }
}
