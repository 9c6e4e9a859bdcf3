//! Dashboard-facing DTOs for the JSON datasource protocol.
//!
//! This module defines the payload shapes exchanged with the dashboard on
//! `/search` and `/query`. Response bodies for reports live in
//! [`crate::report`].

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Represents a `/query` request body, including the selected time range and the panel targets.
#[derive(Deserialize, Debug, Clone)]
pub struct QueryRequest {
    pub range: QueryRange,
    #[serde(default)]
    pub targets: Vec<QueryTarget>,
}

/// Range boundaries as sent by the dashboard: ISO strings or epoch milliseconds.
#[derive(Deserialize, Debug, Clone)]
pub struct QueryRange {
    pub from: Value,
    pub to: Value,
}

/// Represents one panel target: the report identifier or raw filter clause, the wanted output type and optional parameters.
#[derive(Deserialize, Debug, Clone, Default)]
pub struct QueryTarget {
    #[serde(default)]
    pub target: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub data: Option<TargetData>,
}

/// Optional per-target parameters set in the panel's additional JSON data.
#[derive(Deserialize, Debug, Clone, Default)]
pub struct TargetData {
    #[serde(default)]
    pub timerange_type: Option<String>,
    #[serde(default)]
    pub organization: Option<String>,
    #[serde(default)]
    pub agent: Option<String>,
    #[serde(default, alias = "breakdownMode", alias = "breakdown_mode")]
    pub breakdown: Option<String>,
}

/// Represents an entry of the metric picker returned by `/search`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct MetricOption {
    pub text: String,
    pub value: String,
}

/// Error body sent for rejected or failed requests.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ErrorBody {
    pub message: String,
}
