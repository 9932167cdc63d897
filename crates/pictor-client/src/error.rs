//! Error types for pictor-client
//!
//! This module provides error handling for the asset status client.

use pictor_core::{AssetId, Error as CoreError};

/// Result type for all client operations in this crate.
///
/// This is a convenience type alias that defaults to using [`Error`] as the
/// error type.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Unified error type for asset status operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// HTTP client/connection errors
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    /// Serialization errors when sending or receiving data
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// URL parsing errors
    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),

    /// Asset status API error response
    #[error("Asset API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    /// The asset exists but post-edit processing has not finished
    #[error("Asset '{asset_id}' is not processed yet")]
    NotReady { asset_id: AssetId },

    /// The request was aborted by its cancellation token
    #[error("Status request cancelled")]
    Cancelled,

    /// Invalid configuration
    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },
}

impl Error {
    /// Create an API error
    pub fn api_error(status: u16, message: impl Into<String>) -> Self {
        Self::ApiError {
            status,
            message: message.into(),
        }
    }

    /// Create a not-ready error
    pub fn not_ready(asset_id: AssetId) -> Self {
        Self::NotReady { asset_id }
    }

    /// Create an invalid configuration error
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            reason: reason.into(),
        }
    }

    /// Check if this error is retryable
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Http(err) => err.is_timeout() || err.is_connect(),
            Error::NotReady { .. } => true,
            Error::ApiError { status, .. } => *status >= 500 || *status == 429,
            _ => false,
        }
    }

    /// Convert into the structured core error consumed by the poll loop.
    pub fn into_core(self) -> CoreError {
        match self {
            Error::NotReady { asset_id } => CoreError::not_ready()
                .with_message(format!("asset '{}' still queued", asset_id.as_str())),
            Error::Cancelled => CoreError::cancelled(),
            Error::Http(err) if err.is_timeout() => CoreError::timeout().with_source(err),
            Error::Http(err) => CoreError::network_error().with_source(err),
            Error::Serialization(err) => CoreError::serialization().with_source(err),
            Error::UrlParse(err) => CoreError::configuration().with_source(err),
            Error::ApiError { status, message } if status == 401 || status == 403 => {
                CoreError::authentication().with_message(message)
            }
            Error::ApiError { status: 404, .. } => CoreError::not_found(),
            Error::ApiError { status, message } => CoreError::external_error()
                .with_message(format!("status {status}: {message}")),
            Error::InvalidConfig { reason } => CoreError::configuration().with_message(reason),
        }
    }
}

// Import builder error type for From implementation
use crate::client::ClientBuilderError;

impl From<ClientBuilderError> for Error {
    fn from(err: ClientBuilderError) -> Self {
        Error::InvalidConfig {
            reason: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use pictor_core::ErrorKind;

    use super::*;

    #[test]
    fn test_retryable_classification() {
        assert!(Error::not_ready(AssetId::new("img-1")).is_retryable());
        assert!(Error::api_error(503, "unavailable").is_retryable());
        assert!(!Error::api_error(401, "unauthorized").is_retryable());
        assert!(!Error::Cancelled.is_retryable());
    }

    #[test]
    fn test_into_core_mapping() {
        assert_eq!(
            Error::not_ready(AssetId::new("img-1")).into_core().kind(),
            ErrorKind::NotReady
        );
        assert_eq!(Error::Cancelled.into_core().kind(), ErrorKind::Cancelled);
        assert_eq!(
            Error::api_error(401, "nope").into_core().kind(),
            ErrorKind::Authentication
        );
        assert_eq!(
            Error::api_error(404, "gone").into_core().kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            Error::api_error(500, "boom").into_core().kind(),
            ErrorKind::ExternalError
        );
    }
}
