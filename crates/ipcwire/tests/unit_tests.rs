//! Tests for the metered wrapper and wrapper composition.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use ipcwire::prelude::*;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

type TestResult = Result<(), Box<dyn std::error::Error>>;

/// LIFO in-memory transport.
#[derive(Debug, Default)]
struct Stack {
    items: Mutex<Vec<Vec<u8>>>,
}

impl MessageTransport for Stack {
    fn send(&self, payload: &[u8]) -> IpcResult<()> {
        self.items.lock().push(payload.to_vec());
        Ok(())
    }

    fn recv(&self) -> IpcResult<Vec<u8>> {
        self.items.lock().pop().ok_or(IpcError::PeerClosed)
    }
}

/// Byte reads pop whole items; an empty stack reads as end of stream.
impl ByteStream for Stack {
    fn read(&self, max_len: usize) -> IpcResult<Vec<u8>> {
        let mut item = self.items.lock().pop().unwrap_or_default();
        item.truncate(max_len);
        Ok(item)
    }

    fn write(&self, data: &[u8]) -> IpcResult<()> {
        self.items.lock().push(data.to_vec());
        Ok(())
    }
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
struct Reading {
    sensor: String,
    value: i64,
}

#[test]
fn test_successful_calls_are_counted() -> TestResult {
    let metered = Metered::new(Stack::default());
    metered.send(b"12345")?;
    metered.send_json(&Reading {
        sensor: "t1".to_string(),
        value: -4,
    })?;

    let reading: Reading = metered.recv_json()?;
    assert_eq!(reading.value, -4);
    assert_eq!(metered.recv()?, b"12345");

    let snapshot = metered.metrics().snapshot();
    assert_eq!(snapshot.messages_sent, 2);
    assert_eq!(snapshot.messages_received, 2);
    assert_eq!(snapshot.bytes_sent, snapshot.bytes_received);
    assert_eq!(snapshot.latency_samples, 4);
    assert_eq!(snapshot.total_errors(), 0);
    Ok(())
}

#[test]
fn test_end_of_stream_read_is_not_counted() -> TestResult {
    let metered = Metered::new(Stack::default());
    ByteStream::write(&metered, b"abc")?;
    assert_eq!(ByteStream::read(&metered, 16)?, b"abc");
    assert!(ByteStream::read(&metered, 16)?.is_empty());
    assert!(ByteStream::read(&metered, 16)?.is_empty());

    let snapshot = metered.metrics().snapshot();
    assert_eq!(snapshot.messages_received, 1);
    assert_eq!(snapshot.bytes_received, 3);
    assert_eq!(snapshot.latency_samples, 2);
    assert_eq!(snapshot.receive_errors, 0);
    Ok(())
}

#[test]
fn test_failures_are_counted_and_returned() {
    let metered = Metered::new(Stack::default());
    assert!(matches!(metered.recv(), Err(IpcError::PeerClosed)));
    assert!(matches!(
        metered.recv_json::<Reading>(),
        Err(IpcError::PeerClosed)
    ));

    let metrics = metered.metrics();
    assert_eq!(metrics.receive_errors(), 2);
    assert_eq!(metrics.messages_received(), 0);
    assert_eq!(metrics.snapshot().latency_samples, 0);
}

#[test]
fn test_shared_recorder_aggregates_wrappers() -> TestResult {
    let metrics = Arc::new(ChannelMetrics::new());
    let first = Metered::with_metrics(Stack::default(), Arc::clone(&metrics));
    let second = Metered::with_metrics(Stack::default(), Arc::clone(&metrics));
    first.send(b"a")?;
    second.send(b"bc")?;
    assert_eq!(metrics.messages_sent(), 2);
    assert_eq!(metrics.bytes_sent(), 3);
    Ok(())
}

#[test]
fn test_graceful_over_metered_rejects_without_recording() -> TestResult {
    let graceful = Graceful::new(Metered::new(Stack::default()));
    graceful.send(b"before")?;
    graceful.shutdown();
    assert!(matches!(graceful.send(b"after"), Err(IpcError::ChannelShutdown)));

    let metrics = graceful.inner().metrics();
    assert_eq!(metrics.messages_sent(), 1);
    assert_eq!(metrics.send_errors(), 0);
    Ok(())
}

#[test]
fn test_metered_channel_round_trip() -> TestResult {
    let dir = tempfile::tempdir()?;
    let config = TransportConfig::builder()
        .runtime_dir(dir.path())
        .connect_timeout(Duration::from_secs(5))
        .build()?;
    let name = format!("metered-{}", std::process::id());
    let server = Metered::new(Channel::create_with(&name, &config)?);

    let client = thread::spawn(move || -> IpcResult<Vec<u8>> {
        let channel = Metered::new(Channel::connect_with(&name, &config)?);
        for i in 0..10u8 {
            channel.send(&[i; 100])?;
        }
        channel.recv()
    });

    server.wait_for_client()?;
    assert!(server.is_server());
    for i in 0..10u8 {
        assert_eq!(server.recv()?, [i; 100]);
    }
    server.send(b"done")?;

    let reply = client.join().map_err(|e| format!("client thread panicked: {e:?}"))??;
    assert_eq!(reply, b"done");

    let snapshot = server.metrics().snapshot();
    assert_eq!(snapshot.messages_received, 10);
    assert_eq!(snapshot.bytes_received, 1000);
    assert_eq!(snapshot.messages_sent, 1);
    assert!(snapshot.max_latency_us >= snapshot.min_latency_us);
    Ok(())
}
