//! Snapshot tests for the export formats.

use insta::assert_snapshot;
use ipcwire_metrics::MetricsSnapshot;

fn sample() -> MetricsSnapshot {
    MetricsSnapshot {
        messages_sent: 10,
        messages_received: 8,
        bytes_sent: 1000,
        bytes_received: 800,
        send_errors: 1,
        receive_errors: 0,
        queue_depth: 2,
        peak_queue_depth: 5,
        latency_samples: 4,
        avg_latency_us: 12.5,
        min_latency_us: 5,
        max_latency_us: 20,
        p50_latency_us: 10,
        p95_latency_us: 20,
        p99_latency_us: 20,
        elapsed_secs: 2.0,
        send_throughput: 5.0,
        recv_throughput: 4.0,
        send_bandwidth: 500.0,
        recv_bandwidth: 400.0,
    }
}

#[test]
fn test_exposition_format() {
    assert_snapshot!(sample().to_exposition("ipcwire"), @r"
    ipcwire_messages_sent 10
    ipcwire_messages_received 8
    ipcwire_bytes_sent 1000
    ipcwire_bytes_received 800
    ipcwire_send_errors 1
    ipcwire_receive_errors 0
    ipcwire_queue_depth 2
    ipcwire_peak_queue_depth 5
    ipcwire_latency_samples 4
    ipcwire_avg_latency_us 12.500
    ipcwire_min_latency_us 5
    ipcwire_max_latency_us 20
    ipcwire_p50_latency_us 10
    ipcwire_p95_latency_us 20
    ipcwire_p99_latency_us 20
    ipcwire_elapsed_secs 2.000
    ipcwire_send_throughput 5.000
    ipcwire_recv_throughput 4.000
    ipcwire_send_bandwidth 500.000
    ipcwire_recv_bandwidth 400.000
    ");
}

#[test]
fn test_json_format() {
    assert_snapshot!(sample().to_json(), @r#"{"messages_sent":10,"messages_received":8,"bytes_sent":1000,"bytes_received":800,"send_errors":1,"receive_errors":0,"queue_depth":2,"peak_queue_depth":5,"latency_samples":4,"avg_latency_us":12.5,"min_latency_us":5,"max_latency_us":20,"p50_latency_us":10,"p95_latency_us":20,"p99_latency_us":20,"elapsed_secs":2.0,"send_throughput":5.0,"recv_throughput":4.0,"send_bandwidth":500.0,"recv_bandwidth":400.0}"#);
}
