//! Test launch, polling and message endpoints

use std::future::Future;

use microcks_core::domain::message::{RequestResponsePair, UnidirectionalEvent};
use microcks_core::domain::test::{TestRequest, TestResult};
use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::MicrocksClient;
use crate::error::{ClientError, Result};
use crate::poll::{PollConfig, PollError, wait_for_condition};

impl MicrocksClient {
    // =============================================================================
    // Test Runs
    // =============================================================================

    /// Launch a conformance test without waiting for it to complete
    ///
    /// The returned result is the initial snapshot, usually still in progress.
    pub async fn launch_test(&self, request: &TestRequest) -> Result<TestResult> {
        let url = self.url("/api/tests");
        let response = self.client.post(&url).json(request).send().await?;

        if response.status() != reqwest::StatusCode::CREATED {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::api_error(
                status,
                format!("Couldn't launch a new test on Microcks: {}", body),
            ));
        }

        response
            .json()
            .await
            .map_err(|e| ClientError::ParseError(format!("Failed to parse test result: {}", e)))
    }

    /// Get the current state of a test run
    ///
    /// # Arguments
    /// * `id` - The test result identifier returned at launch
    pub async fn get_test_result(&self, id: &str) -> Result<TestResult> {
        let url = self.url(&format!("/api/tests/{}", id));
        let response = self.get(&url).send().await?;
        self.handle_response(response).await
    }

    /// Launch a conformance test and wait for its completion
    ///
    /// Waits for the request timeout plus a small margin. If the test is still
    /// running once that budget is spent, the latest snapshot is returned with
    /// `in_progress` set; only the caller knows whether that counts as failure.
    ///
    /// # Example
    /// ```no_run
    /// # use microcks_client::MicrocksClient;
    /// # use microcks_core::domain::test::{TestRequest, TestRunnerType};
    /// # use std::time::Duration;
    /// # async fn example(client: MicrocksClient) -> anyhow::Result<()> {
    /// let request = TestRequest::new(
    ///     "API Pastries:0.0.1",
    ///     TestRunnerType::OpenApiSchema,
    ///     "http://good-impl:3002",
    ///     Duration::from_secs(2),
    /// );
    /// let result = client.test_endpoint(&request).await?;
    /// assert!(result.success);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn test_endpoint(&self, request: &TestRequest) -> Result<TestResult> {
        self.test_endpoint_with_cancel(request, &CancellationToken::new())
            .await
    }

    /// Same as [`test_endpoint`](Self::test_endpoint), stopping early when
    /// `cancel` fires
    ///
    /// # Errors
    /// Returns [`ClientError::Cancelled`] if the token fires before the test
    /// completes, including while it is being launched. Nothing is launched
    /// when the token is already cancelled. A failed status fetch aborts the
    /// wait and is returned as is.
    pub async fn test_endpoint_with_cancel(
        &self,
        request: &TestRequest,
        cancel: &CancellationToken,
    ) -> Result<TestResult> {
        if cancel.is_cancelled() {
            return Err(ClientError::Cancelled);
        }

        let launched = unless_cancelled(cancel, self.launch_test(request)).await?;
        debug!("Launched test {} on {}", launched.id, request.test_endpoint);

        let config = PollConfig::for_test_run(request.timeout);
        let id = launched.id.as_str();
        let outcome = wait_for_condition(&config, cancel, || async move {
            self.get_test_result(id)
                .await
                .map(|result| result.in_progress)
        })
        .await;

        match outcome {
            Ok(()) => {}
            Err(PollError::Timeout(budget)) => {
                warn!(
                    "Test {} still in progress after {:?}, returning its last state",
                    launched.id, budget
                );
            }
            Err(PollError::Cancelled) => return Err(ClientError::Cancelled),
            Err(PollError::Check(e)) => return Err(e),
        }

        unless_cancelled(cancel, self.get_test_result(&launched.id)).await
    }

    // =============================================================================
    // Exchanged Messages
    // =============================================================================

    /// Get the request/response pairs exchanged while testing an operation
    ///
    /// # Arguments
    /// * `result` - A test result, as returned by [`test_endpoint`](Self::test_endpoint)
    /// * `operation` - Operation name, e.g. `GET /pastries`
    pub async fn get_messages_for_test_case(
        &self,
        result: &TestResult,
        operation: &str,
    ) -> Result<Vec<RequestResponsePair>> {
        self.test_case_messages(result, "messages", operation).await
    }

    /// Get the events received while testing an asynchronous operation
    pub async fn get_event_messages_for_test_case(
        &self,
        result: &TestResult,
        operation: &str,
    ) -> Result<Vec<UnidirectionalEvent>> {
        self.test_case_messages(result, "events", operation).await
    }

    async fn test_case_messages<T: DeserializeOwned>(
        &self,
        result: &TestResult,
        kind: &str,
        operation: &str,
    ) -> Result<Vec<T>> {
        let url = self.url(&format!(
            "/api/tests/{}/{}/{}",
            result.id,
            kind,
            test_case_id(result, operation)
        ));
        let response = self.get(&url).send().await?;
        self.handle_response(response).await
    }
}

/// Run `call`, dropping it as soon as `cancel` fires
async fn unless_cancelled<T>(
    cancel: &CancellationToken,
    call: impl Future<Output = Result<T>>,
) -> Result<T> {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(ClientError::Cancelled),
        result = call => result,
    }
}

/// Identifier Microcks gives the test case of one operation
fn test_case_id(result: &TestResult, operation: &str) -> String {
    let operation = operation.replace('/', "!");
    let encoded: String = url::form_urlencoded::byte_serialize(operation.as_bytes()).collect();
    format!("{}-{}-{}", result.id, result.test_number, encoded)
}
