//! Microcks HTTP Client
//!
//! A small, type-safe HTTP client for the Microcks REST API.
//!
//! The client is owned by the caller: create one per Microcks instance and
//! clone it freely. Clones share the same connection pool, so concurrent test
//! runs polling the same instance do not open a connection each.
//!
//! # Example
//!
//! ```no_run
//! use microcks_client::MicrocksClient;
//! use microcks_core::domain::test::{TestRequest, TestRunnerType};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = MicrocksClient::new("http://localhost:8080");
//!
//!     client.import_main_artifact("apipastries-openapi.yaml").await?;
//!
//!     let result = client
//!         .test_endpoint(&TestRequest::new(
//!             "API Pastries:0.0.1",
//!             TestRunnerType::OpenApiSchema,
//!             "http://good-impl:3002",
//!             Duration::from_secs(2),
//!         ))
//!         .await?;
//!
//!     println!("Test {} success: {}", result.id, result.success);
//!     Ok(())
//! }
//! ```

mod artifacts;
pub mod error;
mod metrics;
mod mocks;
pub mod poll;
mod secrets;
mod test_runs;

// Re-export commonly used types
pub use error::{ClientError, Result};
pub use poll::{PollConfig, PollError, wait_for_condition};
pub use tokio_util::sync::CancellationToken;

use reqwest::header::{ACCEPT, CACHE_CONTROL};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;

/// HTTP client for the Microcks REST API
///
/// This client provides methods for the endpoints a test suite needs,
/// organized into logical groups:
/// - Artifact and snapshot import
/// - Secret creation
/// - Test launch, polling and message inspection
/// - Invocation metrics
/// - Mock endpoint URLs
#[derive(Debug, Clone)]
pub struct MicrocksClient {
    /// Base URL of Microcks (e.g., "http://localhost:8080")
    base_url: String,
    /// HTTP client instance
    client: Client,
}

impl MicrocksClient {
    /// Create a new Microcks client
    ///
    /// # Arguments
    /// * `base_url` - The HTTP endpoint of Microcks (e.g., "http://localhost:8080")
    ///
    /// # Example
    /// ```
    /// use microcks_client::MicrocksClient;
    ///
    /// let client = MicrocksClient::new("http://localhost:8080");
    /// ```
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, Client::new())
    }

    /// Create a new Microcks client with a custom HTTP client
    ///
    /// This allows you to configure timeouts, proxies, TLS settings, etc.
    ///
    /// # Arguments
    /// * `base_url` - The HTTP endpoint of Microcks
    /// * `client` - A configured reqwest Client
    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    /// Get the base URL of Microcks
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build an absolute API URL from a path starting with `/`
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Start a GET request that bypasses caches and asks for JSON
    fn get(&self, url: &str) -> RequestBuilder {
        self.client
            .get(url)
            .header(ACCEPT, "application/json")
            .header(CACHE_CONTROL, "no-cache")
    }

    // =============================================================================
    // Response Handlers
    // =============================================================================

    /// Handle an API response and deserialize JSON
    ///
    /// This method checks the status code and returns an appropriate error if
    /// the request failed, or deserializes the response body if successful.
    async fn handle_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        let status = response.status();

        if !status.is_success() {
            return Err(Self::error_from(response).await);
        }

        response
            .json()
            .await
            .map_err(|e| ClientError::ParseError(format!("Failed to parse JSON response: {}", e)))
    }

    /// Handle an API response that must carry `201 Created`
    ///
    /// Microcks answers every creation endpoint (imports, secrets, tests)
    /// with 201; anything else means the resource was not created.
    async fn expect_created(&self, response: reqwest::Response, what: &str) -> Result<()> {
        if response.status() != StatusCode::CREATED {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::api_error(
                status,
                format!("{} has not been correctly created: {}", what, body),
            ));
        }

        Ok(())
    }

    async fn error_from(response: reqwest::Response) -> ClientError {
        let status = response.status();
        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        ClientError::api_error(status.as_u16(), error_text)
    }
}
