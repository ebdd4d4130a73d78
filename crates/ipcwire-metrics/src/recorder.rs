//! Concurrent channel metrics recorder.
//!
//! [`ChannelMetrics`] is shared between any number of threads, usually behind
//! an `Arc`. Counters are plain atomics updated with `Ordering::Relaxed`; the
//! latency sample set sits behind a single mutex.
//!
//! # Consistency
//!
//! [`ChannelMetrics::snapshot`] reads fields one at a time. A snapshot taken
//! while other threads are recording may pair, say, a `messages_sent` value
//! with a `bytes_sent` value from a slightly later instant. Every individual
//! counter is exact.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use parking_lot::{Mutex, RwLock};
use tracing::debug;

use crate::config::MetricsConfig;
use crate::latency::LatencyHistogram;
use crate::snapshot::MetricsSnapshot;

/// Thread-safe recorder for one channel's traffic.
///
/// # Example
///
/// ```rust
/// use ipcwire_metrics::ChannelMetrics;
///
/// let metrics = ChannelMetrics::new();
/// metrics.record_send(100);
/// metrics.record_recv(50);
/// metrics.record_latency_us(120);
///
/// let snapshot = metrics.snapshot();
/// assert_eq!(snapshot.messages_sent, 1);
/// assert_eq!(snapshot.bytes_received, 50);
/// assert_eq!(snapshot.min_latency_us, 120);
/// ```
#[derive(Debug)]
pub struct ChannelMetrics {
    messages_sent: AtomicU64,
    messages_received: AtomicU64,
    bytes_sent: AtomicU64,
    bytes_received: AtomicU64,
    send_errors: AtomicU64,
    receive_errors: AtomicU64,
    queue_depth: AtomicU64,
    peak_queue_depth: AtomicU64,
    latency: Mutex<LatencyHistogram>,
    started_at: RwLock<Instant>,
}

impl Default for ChannelMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl ChannelMetrics {
    /// Create an empty recorder with the default sample capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(&MetricsConfig::default())
    }

    /// Create an empty recorder from a configuration.
    #[must_use]
    pub fn with_config(config: &MetricsConfig) -> Self {
        Self {
            messages_sent: AtomicU64::new(0),
            messages_received: AtomicU64::new(0),
            bytes_sent: AtomicU64::new(0),
            bytes_received: AtomicU64::new(0),
            send_errors: AtomicU64::new(0),
            receive_errors: AtomicU64::new(0),
            queue_depth: AtomicU64::new(0),
            peak_queue_depth: AtomicU64::new(0),
            latency: Mutex::new(LatencyHistogram::with_capacity(
                config.latency_sample_capacity,
            )),
            started_at: RwLock::new(Instant::now()),
        }
    }

    /// Record one successfully sent message of `bytes` payload bytes.
    #[inline]
    pub fn record_send(&self, bytes: usize) {
        self.messages_sent.fetch_add(1, Ordering::Relaxed);
        self.bytes_sent.fetch_add(bytes as u64, Ordering::Relaxed);
    }

    /// Record one successfully received message of `bytes` payload bytes.
    #[inline]
    pub fn record_recv(&self, bytes: usize) {
        self.messages_received.fetch_add(1, Ordering::Relaxed);
        self.bytes_received.fetch_add(bytes as u64, Ordering::Relaxed);
    }

    /// Record a failed send.
    #[inline]
    pub fn record_send_error(&self) {
        self.send_errors.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a failed receive.
    #[inline]
    pub fn record_recv_error(&self) {
        self.receive_errors.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a latency sample in microseconds.
    pub fn record_latency_us(&self, micros: u64) {
        self.latency.lock().record(micros);
    }

    /// Record a latency sample in milliseconds.
    pub fn record_latency_ms(&self, millis: u64) {
        self.record_latency_us(millis.saturating_mul(1000));
    }

    /// Record a latency sample from a measured duration.
    pub fn record_latency(&self, latency: Duration) {
        self.record_latency_us(u64::try_from(latency.as_micros()).unwrap_or(u64::MAX));
    }

    /// Set the current queue depth. The peak only ever rises.
    #[inline]
    pub fn set_queue_depth(&self, depth: u64) {
        self.queue_depth.store(depth, Ordering::Relaxed);
        self.peak_queue_depth.fetch_max(depth, Ordering::Relaxed);
    }

    /// Messages sent so far.
    #[must_use]
    pub fn messages_sent(&self) -> u64 {
        self.messages_sent.load(Ordering::Relaxed)
    }

    /// Messages received so far.
    #[must_use]
    pub fn messages_received(&self) -> u64 {
        self.messages_received.load(Ordering::Relaxed)
    }

    /// Payload bytes sent so far.
    #[must_use]
    pub fn bytes_sent(&self) -> u64 {
        self.bytes_sent.load(Ordering::Relaxed)
    }

    /// Payload bytes received so far.
    #[must_use]
    pub fn bytes_received(&self) -> u64 {
        self.bytes_received.load(Ordering::Relaxed)
    }

    /// Failed sends so far.
    #[must_use]
    pub fn send_errors(&self) -> u64 {
        self.send_errors.load(Ordering::Relaxed)
    }

    /// Failed receives so far.
    #[must_use]
    pub fn receive_errors(&self) -> u64 {
        self.receive_errors.load(Ordering::Relaxed)
    }

    /// Current queue depth.
    #[must_use]
    pub fn queue_depth(&self) -> u64 {
        self.queue_depth.load(Ordering::Relaxed)
    }

    /// Highest queue depth observed.
    #[must_use]
    pub fn peak_queue_depth(&self) -> u64 {
        self.peak_queue_depth.load(Ordering::Relaxed)
    }

    /// Time since creation or the last reset.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.started_at.read().elapsed()
    }

    /// Messages sent per second.
    #[must_use]
    pub fn send_throughput(&self) -> f64 {
        rate(self.messages_sent(), self.elapsed())
    }

    /// Messages received per second.
    #[must_use]
    pub fn recv_throughput(&self) -> f64 {
        rate(self.messages_received(), self.elapsed())
    }

    /// Bytes sent per second.
    #[must_use]
    pub fn send_bandwidth(&self) -> f64 {
        rate(self.bytes_sent(), self.elapsed())
    }

    /// Bytes received per second.
    #[must_use]
    pub fn recv_bandwidth(&self) -> f64 {
        rate(self.bytes_received(), self.elapsed())
    }

    /// Nearest-rank latency percentile in microseconds, 0 with no samples.
    #[must_use]
    pub fn latency_percentile(&self, p: f64) -> u64 {
        self.latency.lock().percentile(p)
    }

    /// Mean latency in microseconds, 0.0 with no samples.
    #[must_use]
    pub fn avg_latency_us(&self) -> f64 {
        self.latency.lock().mean()
    }

    /// Zero every counter, forget all samples and restart the clock.
    pub fn reset(&self) {
        self.messages_sent.store(0, Ordering::Relaxed);
        self.messages_received.store(0, Ordering::Relaxed);
        self.bytes_sent.store(0, Ordering::Relaxed);
        self.bytes_received.store(0, Ordering::Relaxed);
        self.send_errors.store(0, Ordering::Relaxed);
        self.receive_errors.store(0, Ordering::Relaxed);
        self.queue_depth.store(0, Ordering::Relaxed);
        self.peak_queue_depth.store(0, Ordering::Relaxed);
        self.latency.lock().clear();
        *self.started_at.write() = Instant::now();
        debug!("channel metrics reset");
    }

    /// Take a point-in-time copy of every metric.
    #[must_use]
    pub fn snapshot(&self) -> MetricsSnapshot {
        let elapsed = self.elapsed();
        let messages_sent = self.messages_sent();
        let messages_received = self.messages_received();
        let bytes_sent = self.bytes_sent();
        let bytes_received = self.bytes_received();

        let mut latency = self.latency.lock();
        let latency_samples = latency.count();
        let avg_latency_us = latency.mean();
        let min_latency_us = latency.min();
        let max_latency_us = latency.max();
        let p50_latency_us = latency.percentile(50.0);
        let p95_latency_us = latency.percentile(95.0);
        let p99_latency_us = latency.percentile(99.0);
        drop(latency);

        MetricsSnapshot {
            messages_sent,
            messages_received,
            bytes_sent,
            bytes_received,
            send_errors: self.send_errors(),
            receive_errors: self.receive_errors(),
            queue_depth: self.queue_depth(),
            peak_queue_depth: self.peak_queue_depth(),
            latency_samples,
            avg_latency_us,
            min_latency_us,
            max_latency_us,
            p50_latency_us,
            p95_latency_us,
            p99_latency_us,
            elapsed_secs: elapsed.as_secs_f64(),
            send_throughput: rate(messages_sent, elapsed),
            recv_throughput: rate(messages_received, elapsed),
            send_bandwidth: rate(bytes_sent, elapsed),
            recv_bandwidth: rate(bytes_received, elapsed),
        }
    }

    /// Snapshot as compact JSON.
    #[must_use]
    pub fn to_json(&self) -> String {
        self.snapshot().to_json()
    }

    /// Snapshot as indented JSON.
    #[must_use]
    pub fn to_json_pretty(&self) -> String {
        self.snapshot().to_json_pretty()
    }

    /// Snapshot as `<prefix>_<metric> <value>` lines.
    #[must_use]
    pub fn to_exposition(&self, prefix: &str) -> String {
        self.snapshot().to_exposition(prefix)
    }
}

fn rate(count: u64, elapsed: Duration) -> f64 {
    let secs = elapsed.as_secs_f64();
    if secs <= 0.0 {
        return 0.0;
    }
    count as f64 / secs
}
