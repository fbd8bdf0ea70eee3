//! Metrics emission boundary

use serde::{Deserialize, Serialize};

/// Value carried by one emitted measurement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetricValue {
    Number(f64),
    Text(String),
    Flag(bool),
}

impl From<f64> for MetricValue {
    fn from(v: f64) -> Self {
        MetricValue::Number(v)
    }
}

impl From<i64> for MetricValue {
    fn from(v: i64) -> Self {
        MetricValue::Number(v as f64)
    }
}

impl From<bool> for MetricValue {
    fn from(v: bool) -> Self {
        MetricValue::Flag(v)
    }
}

impl From<&str> for MetricValue {
    fn from(v: &str) -> Self {
        MetricValue::Text(v.to_string())
    }
}

/// Destination for derived measurements.
///
/// Attached at most once per tracker; when absent, measurements are
/// computed and dropped, never buffered.
pub trait MetricsSink: Send + Sync {
    fn emit(&self, name: &str, value: MetricValue);
}
