//! Invocation metrics endpoints

use std::time::Duration;

use chrono::NaiveDate;
use microcks_core::domain::metrics::DailyInvocationStatistic;
use reqwest::{StatusCode, Url};
use tracing::debug;

use crate::MicrocksClient;
use crate::error::{ClientError, Result};

/// Time given to Microcks to flush invocation counters before reading them
const METRICS_SETTLE_DELAY: Duration = Duration::from_millis(100);

impl MicrocksClient {
    /// Get the invocation statistics of a mocked service
    ///
    /// Returns `None` when Microcks has no statistics for this service on
    /// this day.
    ///
    /// # Arguments
    /// * `service` - Service name, e.g. `API Pastries`
    /// * `version` - Service version, e.g. `0.0.1`
    /// * `day` - Day to query; Microcks defaults to today when `None`
    pub async fn get_service_invocations(
        &self,
        service: &str,
        version: &str,
        day: Option<NaiveDate>,
    ) -> Result<Option<DailyInvocationStatistic>> {
        tokio::time::sleep(METRICS_SETTLE_DELAY).await;

        let url = self.invocations_url(service, version, day)?;
        let response = self.get(url.as_str()).send().await?;

        if response.status() != StatusCode::OK {
            debug!(
                "No invocation statistics for {}:{} (status {})",
                service,
                version,
                response.status()
            );
            return Ok(None);
        }

        let body = response.text().await?;
        if body.trim().is_empty() {
            return Ok(None);
        }

        serde_json::from_str(&body)
            .map(Some)
            .map_err(|e| ClientError::ParseError(format!("Failed to parse invocation statistics: {}", e)))
    }

    /// Number of times the mocks of a service were invoked on `day`
    pub async fn get_service_invocations_count(
        &self,
        service: &str,
        version: &str,
        day: Option<NaiveDate>,
    ) -> Result<u64> {
        Ok(self
            .get_service_invocations(service, version, day)
            .await?
            .map(|stats| stats.daily_count)
            .unwrap_or(0))
    }

    /// Check that the mocks of a service were invoked at least once on `day`
    pub async fn verify(&self, service: &str, version: &str, day: Option<NaiveDate>) -> Result<bool> {
        Ok(self.get_service_invocations_count(service, version, day).await? > 0)
    }

    fn invocations_url(&self, service: &str, version: &str, day: Option<NaiveDate>) -> Result<Url> {
        let mut url = Url::parse(&self.url("/api/metrics/invocations"))
            .map_err(|e| ClientError::InvalidRequest(format!("invalid base URL: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidRequest("base URL cannot have a path".to_string()))?
            .extend([service, version]);

        if let Some(day) = day {
            url.query_pairs_mut()
                .append_pair("day", &day.format("%Y%m%d").to_string());
        }

        Ok(url)
    }
}
