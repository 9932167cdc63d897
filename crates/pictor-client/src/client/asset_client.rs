//! Asset status client implementation
//!
//! This module provides the main client interface for querying the remote
//! asset service. It handles authentication, request/response processing,
//! and connection management.

use pictor_core::{AssetId, AssetRecord};
use reqwest::{Client as HttpClient, ClientBuilder as HttpClientBuilder};
use tokio_util::sync::CancellationToken;

use super::{ClientConfig, Credentials};
use crate::TRACING_TARGET_CLIENT;
use crate::error::{Error, Result};

/// Client for the remote asset status endpoint.
///
/// The client handles authentication and connection pooling; each
/// [`status`](AssetClient::status) call is a single request, aborted
/// promptly when its cancellation token fires. Retry and backoff are the
/// caller's concern.
///
/// # Examples
///
/// ```rust,ignore
/// use pictor_client::{AssetClient, ClientConfig, Credentials};
/// use std::time::Duration;
///
/// let config = ClientConfig::builder()
///     .with_base_url("https://assets.example.com/v1")?
///     .with_timeout(Duration::from_secs(30))
///     .build()?;
///
/// let credentials = Credentials::bearer_token("your-token");
/// let client = AssetClient::new(config, credentials)?;
/// ```
#[derive(Debug, Clone)]
pub struct AssetClient {
    http_client: HttpClient,
    config: ClientConfig,
    credentials: Credentials,
}

impl AssetClient {
    /// Create a new asset client with the given configuration and
    /// credentials.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created or if the
    /// configuration is invalid.
    pub fn new(config: ClientConfig, credentials: Credentials) -> Result<Self> {
        tracing::debug!(
            target: TRACING_TARGET_CLIENT,
            base_url = %config.base_url,
            "Creating asset client"
        );

        let http_client = HttpClientBuilder::new()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .user_agent(&config.user_agent)
            .build()
            .map_err(Error::Http)?;

        Ok(Self {
            http_client,
            config,
            credentials,
        })
    }

    /// Create a new asset client with default configuration.
    pub fn with_defaults(base_url: impl AsRef<str>, credentials: Credentials) -> Result<Self> {
        let config = ClientConfig::builder()
            .with_base_url(base_url.as_ref())?
            .build()?;

        Self::new(config, credentials)
    }

    /// Perform a health check against the asset service.
    ///
    /// This method verifies that the service is accessible and the
    /// credentials are valid.
    pub async fn health_check(&self) -> Result<()> {
        tracing::debug!(
            target: TRACING_TARGET_CLIENT,
            "Performing health check"
        );

        let url = self
            .config
            .base_url
            .join("/health")
            .map_err(|e| Error::invalid_config(format!("Invalid health check URL: {}", e)))?;

        let mut request = self.http_client.get(url);
        request = self.add_auth_headers(request);

        let response = request.send().await.map_err(Error::Http)?;

        if response.status().is_success() {
            Ok(())
        } else {
            let status = response.status().as_u16();
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());

            tracing::error!(
                target: TRACING_TARGET_CLIENT,
                status,
                message,
                "Health check failed"
            );

            Err(Error::api_error(status, message))
        }
    }

    /// Fetch the current record for an asset.
    ///
    /// Classifies the response: a record whose metadata reports a finished
    /// processing run is returned as-is; a record still queued (or with no
    /// status yet) yields [`Error::NotReady`]; everything else is an API or
    /// transport error. The request aborts with [`Error::Cancelled`] as
    /// soon as `cancel` fires.
    pub async fn status(
        &self,
        asset_id: &AssetId,
        cancel: &CancellationToken,
    ) -> Result<AssetRecord> {
        let mut url = self.config.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| Error::invalid_config("Base URL cannot be a base"))?
            .pop_if_empty()
            .extend(["assets", asset_id.as_str()]);

        let request = self.add_auth_headers(self.http_client.get(url));

        let response = tokio::select! {
            biased;

            () = cancel.cancelled() => {
                tracing::debug!(
                    target: TRACING_TARGET_CLIENT,
                    asset_id = %asset_id,
                    "Status request cancelled"
                );
                return Err(Error::Cancelled);
            }

            result = request.send() => result.map_err(Error::Http)?,
        };

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());

            tracing::warn!(
                target: TRACING_TARGET_CLIENT,
                asset_id = %asset_id,
                status,
                message,
                "Status request failed"
            );

            return Err(Error::api_error(status, message));
        }

        let record: AssetRecord = response.json().await.map_err(Error::Http)?;

        if record.is_processed() {
            tracing::debug!(
                target: TRACING_TARGET_CLIENT,
                asset_id = %asset_id,
                width = record.metadata.width,
                height = record.metadata.height,
                "Asset processed"
            );
            Ok(record)
        } else {
            Err(Error::not_ready(asset_id.clone()))
        }
    }

    /// Get the client configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Get the credentials type (for debugging/logging purposes only).
    pub fn credentials_type(&self) -> &'static str {
        match &self.credentials {
            Credentials::BearerToken(_) => "bearer_token",
            Credentials::ApiKey(_) => "api_key",
            Credentials::None => "none",
        }
    }

    /// Add authentication headers to a request.
    fn add_auth_headers(&self, mut request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.credentials {
            Credentials::BearerToken(token) => {
                request = request.header("Authorization", format!("Bearer {}", token));
            }
            Credentials::ApiKey(key) => {
                request = request.header("X-API-Key", key);
            }
            Credentials::None => {
                // No authentication headers needed
            }
        }
        request
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = AssetClient::new(ClientConfig::default(), Credentials::bearer_token("t"))
            .expect("client builds");
        assert_eq!(client.credentials_type(), "bearer_token");
    }

    #[tokio::test]
    async fn test_status_aborts_on_precancelled_token() {
        let client = AssetClient::with_defaults("https://assets.invalid/v1", Credentials::none())
            .expect("client builds");
        let cancel = CancellationToken::new();
        cancel.cancel();

        let err = client
            .status(&AssetId::new("img-1"), &cancel)
            .await
            .expect_err("cancelled");
        assert!(matches!(err, Error::Cancelled));
    }
}
