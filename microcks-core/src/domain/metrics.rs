//! Invocation metrics domain types

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Mock invocation counters of one service for one day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyInvocationStatistic {
    #[serde(default)]
    pub id: Option<String>,
    /// Day formatted as `yyyyMMdd`
    pub day: String,
    pub service_name: String,
    pub service_version: String,
    pub daily_count: u64,
    #[serde(default)]
    pub hourly_count: HashMap<String, serde_json::Value>,
    #[serde(default)]
    pub minute_count: HashMap<String, serde_json::Value>,
}
