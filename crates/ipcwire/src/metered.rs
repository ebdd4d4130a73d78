//! Transport wrapper feeding a metrics recorder

use std::sync::Arc;
use std::time::Instant;

use ipcwire_errors::IpcResult;
use ipcwire_metrics::ChannelMetrics;
use ipcwire_transport::{ByteStream, Endpoint, MessageTransport, Role};
use tracing::trace;

/// A transport that records every send and receive into a [`ChannelMetrics`]
///
/// Successful calls count the message, its bytes and the call latency.
/// Failed calls count an error and return it unchanged. Several wrappers may
/// share one recorder.
#[derive(Debug)]
pub struct Metered<T> {
    inner: T,
    metrics: Arc<ChannelMetrics>,
}

impl<T> Metered<T> {
    /// Wrap `inner` with a fresh recorder
    pub fn new(inner: T) -> Self {
        Self::with_metrics(inner, Arc::new(ChannelMetrics::new()))
    }

    /// Wrap `inner`, recording into `metrics`
    pub fn with_metrics(inner: T, metrics: Arc<ChannelMetrics>) -> Self {
        Self { inner, metrics }
    }

    /// Recorder this wrapper feeds
    pub fn metrics(&self) -> &Arc<ChannelMetrics> {
        &self.metrics
    }

    /// Wrapped transport. Calls made through it are not recorded.
    pub fn inner(&self) -> &T {
        &self.inner
    }

    /// Unwrap the transport
    pub fn into_inner(self) -> T {
        self.inner
    }

    fn record_send(&self, started: Instant, result: IpcResult<()>, len: usize) -> IpcResult<()> {
        match result {
            Ok(()) => {
                self.metrics.record_send(len);
                self.metrics.record_latency(started.elapsed());
                Ok(())
            }
            Err(e) => {
                self.metrics.record_send_error();
                trace!("Send of {} bytes failed: {}", len, e);
                Err(e)
            }
        }
    }

    fn record_recv(&self, started: Instant, result: IpcResult<Vec<u8>>) -> IpcResult<Vec<u8>> {
        match result {
            Ok(bytes) => {
                self.metrics.record_recv(bytes.len());
                self.metrics.record_latency(started.elapsed());
                Ok(bytes)
            }
            Err(e) => {
                self.metrics.record_recv_error();
                trace!("Receive failed: {}", e);
                Err(e)
            }
        }
    }
}

impl<T: MessageTransport> MessageTransport for Metered<T> {
    fn send(&self, payload: &[u8]) -> IpcResult<()> {
        let started = Instant::now();
        let result = self.inner.send(payload);
        self.record_send(started, result, payload.len())
    }

    fn recv(&self) -> IpcResult<Vec<u8>> {
        let started = Instant::now();
        let result = self.inner.recv();
        self.record_recv(started, result)
    }
}

impl<T: ByteStream> ByteStream for Metered<T> {
    fn read(&self, max_len: usize) -> IpcResult<Vec<u8>> {
        let started = Instant::now();
        match self.inner.read(max_len) {
            // End of stream, nothing was received.
            Ok(bytes) if bytes.is_empty() && max_len > 0 => Ok(bytes),
            result => self.record_recv(started, result),
        }
    }

    fn write(&self, data: &[u8]) -> IpcResult<()> {
        let started = Instant::now();
        let result = self.inner.write(data);
        self.record_send(started, result, data.len())
    }
}

impl<T: Endpoint> Endpoint for Metered<T> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn role(&self) -> Role {
        self.inner.role()
    }

    fn wait_for_client(&self) -> IpcResult<()> {
        self.inner.wait_for_client()
    }
}
