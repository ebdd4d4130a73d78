//! Convenient re-exports.

pub use crate::config::MetricsConfig;
pub use crate::recorder::ChannelMetrics;
pub use crate::snapshot::MetricsSnapshot;
