//! Thread-safe metrics for ipcwire channels
//!
//! # Architecture
//!
//! - [`recorder`]: [`ChannelMetrics`], the shared recorder updated on every send/receive
//! - [`latency`]: Latency sample set with nearest-rank percentiles
//! - [`snapshot`]: [`MetricsSnapshot`] and its JSON and line exposition exports
//! - [`config`]: Recorder configuration
//!
//! Recording never fails and never blocks on anything but the latency lock,
//! so the recorder can sit directly on a transport's hot path.
//!
//! # Example
//!
//! ```rust
//! use ipcwire_metrics::prelude::*;
//! use std::sync::Arc;
//!
//! let metrics = Arc::new(ChannelMetrics::new());
//! metrics.record_send(64);
//! metrics.set_queue_depth(4);
//!
//! let text = metrics.to_exposition("ipcwire");
//! assert!(text.contains("ipcwire_messages_sent 1"));
//! assert!(text.contains("ipcwire_peak_queue_depth 4"));
//! ```

#![deny(unsafe_op_in_unsafe_fn, clippy::unwrap_used)]
#![warn(missing_docs, rust_2018_idioms)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod config;
pub mod latency;
pub mod prelude;
pub mod recorder;
pub mod snapshot;

pub use config::{MetricsConfig, MetricsConfigError};
pub use latency::{DEFAULT_SAMPLE_CAPACITY, LatencyHistogram};
pub use recorder::ChannelMetrics;
pub use snapshot::{MetricValue, MetricsSnapshot};

/// Prefix used by exposition output when the caller has no preference.
pub const DEFAULT_EXPOSITION_PREFIX: &str = "ipcwire";
