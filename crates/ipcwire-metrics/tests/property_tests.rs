//! Property-based tests for ipcwire-metrics using quickcheck.

use ipcwire_metrics::{ChannelMetrics, LatencyHistogram};
use quickcheck_macros::quickcheck;

#[quickcheck]
fn prop_send_counter_matches_calls(sizes: Vec<u16>) -> bool {
    let metrics = ChannelMetrics::new();
    for size in &sizes {
        metrics.record_send(usize::from(*size));
    }

    let total: u64 = sizes.iter().map(|s| u64::from(*s)).sum();
    metrics.messages_sent() == sizes.len() as u64 && metrics.bytes_sent() == total
}

#[quickcheck]
fn prop_peak_is_running_max(depths: Vec<u32>) -> bool {
    let metrics = ChannelMetrics::new();
    for depth in &depths {
        metrics.set_queue_depth(u64::from(*depth));
    }

    let expected_peak = depths.iter().copied().max().map_or(0, u64::from);
    let expected_current = depths.last().copied().map_or(0, u64::from);
    metrics.peak_queue_depth() == expected_peak && metrics.queue_depth() == expected_current
}

#[quickcheck]
fn prop_percentile_is_monotonic(samples: Vec<u32>, a: u8, b: u8) -> bool {
    let mut hist = LatencyHistogram::default();
    for s in &samples {
        hist.record(u64::from(*s));
    }

    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    hist.percentile(f64::from(lo)) <= hist.percentile(f64::from(hi))
}

#[quickcheck]
fn prop_percentile_within_min_max(samples: Vec<u32>, p: u8) -> bool {
    let mut hist = LatencyHistogram::default();
    for s in &samples {
        hist.record(u64::from(*s));
    }

    let value = hist.percentile(f64::from(p));
    if samples.is_empty() {
        return value == 0;
    }
    hist.min() <= value && value <= hist.max()
}

#[quickcheck]
fn prop_error_rate_is_a_percentage(sent: u8, errors: u8) -> bool {
    let metrics = ChannelMetrics::new();
    for _ in 0..sent {
        metrics.record_send(1);
    }
    for _ in 0..errors {
        metrics.record_send_error();
    }

    let pct = metrics.snapshot().error_rate_percent();
    (0.0..=100.0).contains(&pct)
}

#[quickcheck]
fn prop_reset_zeroes_snapshot(sends: u8, latency: u32) -> bool {
    let metrics = ChannelMetrics::new();
    for _ in 0..sends {
        metrics.record_send(8);
    }
    metrics.record_latency_us(u64::from(latency));
    metrics.reset();

    let snapshot = metrics.snapshot();
    snapshot.messages_sent == 0 && snapshot.bytes_sent == 0 && snapshot.latency_samples == 0
}
