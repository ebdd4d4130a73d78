//! Latency sample storage.
//!
//! [`LatencyHistogram`] keeps exact running min/max/sum over every recorded
//! sample and a bounded sample set for percentile queries. Once the sample set
//! is full, reservoir sampling keeps it a uniform sample of everything recorded.

use rand::Rng;

/// Default number of samples retained for percentile queries.
pub const DEFAULT_SAMPLE_CAPACITY: usize = 100_000;

/// Latency samples in microseconds.
#[derive(Debug, Clone)]
pub struct LatencyHistogram {
    samples: Vec<u64>,
    capacity: usize,
    sorted: bool,
    count: u64,
    sum: u128,
    min: u64,
    max: u64,
}

impl Default for LatencyHistogram {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_SAMPLE_CAPACITY)
    }
}

impl LatencyHistogram {
    /// Create an empty histogram retaining at most `capacity` samples.
    ///
    /// A capacity of zero is raised to one.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: Vec::with_capacity(capacity.min(1024)),
            capacity,
            sorted: true,
            count: 0,
            sum: 0,
            min: u64::MAX,
            max: 0,
        }
    }

    /// Record one sample.
    pub fn record(&mut self, micros: u64) {
        self.count = self.count.saturating_add(1);
        self.sum = self.sum.saturating_add(u128::from(micros));
        self.min = self.min.min(micros);
        self.max = self.max.max(micros);

        if self.samples.len() < self.capacity {
            self.samples.push(micros);
        } else {
            let slot = rand::rng().random_range(0..self.count);
            if let Some(entry) = usize::try_from(slot)
                .ok()
                .and_then(|slot| self.samples.get_mut(slot))
            {
                *entry = micros;
            }
        }
        self.sorted = false;
    }

    /// Number of samples recorded since creation or the last clear.
    #[must_use]
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Number of samples currently retained.
    #[must_use]
    pub fn retained(&self) -> usize {
        self.samples.len()
    }

    /// Check if no samples have been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Smallest recorded sample, or 0 when empty.
    #[must_use]
    pub fn min(&self) -> u64 {
        if self.is_empty() { 0 } else { self.min }
    }

    /// Largest recorded sample, or 0 when empty.
    #[must_use]
    pub fn max(&self) -> u64 {
        self.max
    }

    /// Mean of all recorded samples, or 0.0 when empty.
    #[must_use]
    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            return 0.0;
        }
        self.sum as f64 / self.count as f64
    }

    /// Nearest-rank percentile over the retained samples.
    ///
    /// `p` is clamped to `[0, 100]` and NaN is treated as 0. Returns 0 when
    /// no samples have been recorded.
    pub fn percentile(&mut self, p: f64) -> u64 {
        let n = self.samples.len();
        if n == 0 {
            return 0;
        }
        if !self.sorted {
            self.samples.sort_unstable();
            self.sorted = true;
        }

        let p = if p.is_nan() { 0.0 } else { p.clamp(0.0, 100.0) };
        let rank = ((p / 100.0) * n as f64).ceil() as usize;
        let index = rank.clamp(1, n) - 1;
        self.samples.get(index).copied().unwrap_or(0)
    }

    /// Forget every sample.
    pub fn clear(&mut self) {
        self.samples.clear();
        self.sorted = true;
        self.count = 0;
        self.sum = 0;
        self.min = u64::MAX;
        self.max = 0;
    }
}
