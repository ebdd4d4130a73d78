//! Point-in-time metrics view and its export formats.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Immutable copy of a recorder's derived view.
///
/// Latency values are in microseconds, throughput in messages per second and
/// bandwidth in bytes per second. Latency fields are 0 when no sample has
/// been recorded.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    /// Messages sent successfully
    pub messages_sent: u64,
    /// Messages received successfully
    pub messages_received: u64,
    /// Payload bytes sent
    pub bytes_sent: u64,
    /// Payload bytes received
    pub bytes_received: u64,
    /// Failed sends
    pub send_errors: u64,
    /// Failed receives
    pub receive_errors: u64,
    /// Current queue depth
    pub queue_depth: u64,
    /// Highest queue depth observed
    pub peak_queue_depth: u64,
    /// Latency samples recorded
    pub latency_samples: u64,
    /// Mean latency
    pub avg_latency_us: f64,
    /// Smallest latency
    pub min_latency_us: u64,
    /// Largest latency
    pub max_latency_us: u64,
    /// Median latency
    pub p50_latency_us: u64,
    /// 95th percentile latency
    pub p95_latency_us: u64,
    /// 99th percentile latency
    pub p99_latency_us: u64,
    /// Seconds since creation or the last reset
    pub elapsed_secs: f64,
    /// Messages sent per second
    pub send_throughput: f64,
    /// Messages received per second
    pub recv_throughput: f64,
    /// Bytes sent per second
    pub send_bandwidth: f64,
    /// Bytes received per second
    pub recv_bandwidth: f64,
}

/// A single exported metric value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MetricValue {
    /// Counter or gauge
    Int(u64),
    /// Derived ratio
    Float(f64),
}

impl fmt::Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricValue::Int(v) => write!(f, "{v}"),
            MetricValue::Float(v) => write!(f, "{v:.3}"),
        }
    }
}

impl MetricsSnapshot {
    /// Total failed operations in both directions.
    #[must_use]
    pub fn total_errors(&self) -> u64 {
        self.send_errors.saturating_add(self.receive_errors)
    }

    /// Total successful messages in both directions.
    #[must_use]
    pub fn total_messages(&self) -> u64 {
        self.messages_sent.saturating_add(self.messages_received)
    }

    /// Failed operations as a percentage of all attempts.
    ///
    /// Returns 0.0 when nothing has been attempted.
    #[must_use]
    pub fn error_rate_percent(&self) -> f64 {
        let errors = self.total_errors();
        let attempts = self.total_messages().saturating_add(errors);
        if attempts == 0 {
            return 0.0;
        }
        (errors as f64 / attempts as f64) * 100.0
    }

    /// Every exported metric, in a stable order.
    #[must_use]
    pub fn fields(&self) -> [(&'static str, MetricValue); 20] {
        use MetricValue::{Float, Int};
        [
            ("messages_sent", Int(self.messages_sent)),
            ("messages_received", Int(self.messages_received)),
            ("bytes_sent", Int(self.bytes_sent)),
            ("bytes_received", Int(self.bytes_received)),
            ("send_errors", Int(self.send_errors)),
            ("receive_errors", Int(self.receive_errors)),
            ("queue_depth", Int(self.queue_depth)),
            ("peak_queue_depth", Int(self.peak_queue_depth)),
            ("latency_samples", Int(self.latency_samples)),
            ("avg_latency_us", Float(self.avg_latency_us)),
            ("min_latency_us", Int(self.min_latency_us)),
            ("max_latency_us", Int(self.max_latency_us)),
            ("p50_latency_us", Int(self.p50_latency_us)),
            ("p95_latency_us", Int(self.p95_latency_us)),
            ("p99_latency_us", Int(self.p99_latency_us)),
            ("elapsed_secs", Float(self.elapsed_secs)),
            ("send_throughput", Float(self.send_throughput)),
            ("recv_throughput", Float(self.recv_throughput)),
            ("send_bandwidth", Float(self.send_bandwidth)),
            ("recv_bandwidth", Float(self.recv_bandwidth)),
        ]
    }

    /// Serialize as a compact JSON object.
    #[must_use]
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    /// Serialize as an indented JSON object.
    #[must_use]
    pub fn to_json_pretty(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    /// Render as `<prefix>_<metric> <value>` lines, one per metric.
    ///
    /// An empty prefix emits the bare metric names.
    #[must_use]
    pub fn to_exposition(&self, prefix: &str) -> String {
        self.fields()
            .iter()
            .map(|(name, value)| {
                if prefix.is_empty() {
                    format!("{name} {value}\n")
                } else {
                    format!("{prefix}_{name} {value}\n")
                }
            })
            .collect()
    }
}
