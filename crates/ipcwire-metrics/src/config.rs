//! Recorder configuration.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::latency::DEFAULT_SAMPLE_CAPACITY;

/// Rejected metrics configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MetricsConfigError {
    /// The latency sample capacity must hold at least one sample
    #[error("latency_sample_capacity must be greater than 0")]
    ZeroSampleCapacity,
}

/// Metrics recorder configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    /// Latency samples retained for percentile queries.
    pub latency_sample_capacity: usize,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            latency_sample_capacity: DEFAULT_SAMPLE_CAPACITY,
        }
    }
}

impl MetricsConfig {
    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the sample capacity is zero.
    pub fn validate(&self) -> Result<(), MetricsConfigError> {
        if self.latency_sample_capacity == 0 {
            return Err(MetricsConfigError::ZeroSampleCapacity);
        }
        Ok(())
    }

    /// Set the latency sample capacity.
    #[must_use]
    pub fn with_latency_sample_capacity(mut self, capacity: usize) -> Self {
        self.latency_sample_capacity = capacity;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert_eq!(MetricsConfig::default().validate(), Ok(()));
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let config = MetricsConfig::default().with_latency_sample_capacity(0);
        assert_eq!(
            config.validate(),
            Err(MetricsConfigError::ZeroSampleCapacity)
        );
    }
}
