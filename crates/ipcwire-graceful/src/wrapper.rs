//! Shutdown-aware transport wrapper

use std::sync::Arc;
use std::time::Duration;

use ipcwire_errors::IpcResult;
use ipcwire_transport::{ByteStream, Channel, Endpoint, MessageTransport, NamedPipe, Role};

use crate::coordinator::ShutdownCoordinator;
use crate::state::ShutdownState;

/// A transport whose operations are gated and counted by a [`ShutdownCoordinator`]
///
/// Data semantics are those of the wrapped transport; the only addition is
/// that every operation fails with
/// [`IpcError::ChannelShutdown`](ipcwire_errors::IpcError::ChannelShutdown)
/// once shutdown has begun. Transport errors pass through unchanged.
#[derive(Debug)]
pub struct Graceful<T> {
    inner: T,
    coordinator: Arc<ShutdownCoordinator>,
}

/// [`NamedPipe`] with graceful shutdown
pub type GracefulPipe = Graceful<NamedPipe>;

/// [`Channel`] with graceful shutdown
pub type GracefulChannel = Graceful<Channel>;

impl<T> Graceful<T> {
    /// Wrap `inner` with its own coordinator
    pub fn new(inner: T) -> Self {
        Self::with_coordinator(inner, Arc::new(ShutdownCoordinator::new()))
    }

    /// Wrap `inner` with a coordinator shared with other transports
    pub fn with_coordinator(inner: T, coordinator: Arc<ShutdownCoordinator>) -> Self {
        Self { inner, coordinator }
    }

    /// Wrapped transport. Calls made through it bypass the coordinator.
    pub fn inner(&self) -> &T {
        &self.inner
    }

    /// Unwrap the transport
    pub fn into_inner(self) -> T {
        self.inner
    }

    /// Coordinator gating this transport
    pub fn coordinator(&self) -> &Arc<ShutdownCoordinator> {
        &self.coordinator
    }

    /// See [`ShutdownCoordinator::shutdown`]
    pub fn shutdown(&self) -> bool {
        self.coordinator.shutdown()
    }

    /// See [`ShutdownCoordinator::drain`]
    pub fn drain(&self) {
        self.coordinator.drain();
    }

    /// See [`ShutdownCoordinator::drain_timeout`]
    ///
    /// # Errors
    ///
    /// Returns `DrainTimeout` if operations are still in flight at the deadline.
    pub fn drain_timeout(&self, timeout: Duration) -> IpcResult<()> {
        self.coordinator.drain_timeout(timeout)
    }

    /// See [`ShutdownCoordinator::shutdown_timeout`]
    ///
    /// # Errors
    ///
    /// Returns `DrainTimeout` if operations are still in flight at the deadline.
    pub fn shutdown_timeout(&self, timeout: Duration) -> IpcResult<()> {
        self.coordinator.shutdown_timeout(timeout)
    }

    /// Current lifecycle state
    pub fn state(&self) -> ShutdownState {
        self.coordinator.state()
    }

    /// Whether shutdown has begun
    pub fn is_shutdown(&self) -> bool {
        self.coordinator.is_shutdown()
    }

    /// Operations currently executing through any transport sharing the coordinator
    pub fn in_flight(&self) -> usize {
        self.coordinator.in_flight()
    }

    fn guarded<R>(&self, op: impl FnOnce(&T) -> IpcResult<R>) -> IpcResult<R> {
        let _operation = self.coordinator.begin_operation()?;
        op(&self.inner)
    }
}

impl<T: ByteStream> ByteStream for Graceful<T> {
    fn read(&self, max_len: usize) -> IpcResult<Vec<u8>> {
        self.guarded(|inner| inner.read(max_len))
    }

    fn write(&self, data: &[u8]) -> IpcResult<()> {
        self.guarded(|inner| inner.write(data))
    }
}

impl<T: MessageTransport> MessageTransport for Graceful<T> {
    fn send(&self, payload: &[u8]) -> IpcResult<()> {
        self.guarded(|inner| inner.send(payload))
    }

    fn recv(&self) -> IpcResult<Vec<u8>> {
        self.guarded(|inner| inner.recv())
    }
}

impl<T: Endpoint> Endpoint for Graceful<T> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn role(&self) -> Role {
        self.inner.role()
    }

    fn wait_for_client(&self) -> IpcResult<()> {
        self.guarded(|inner| inner.wait_for_client())
    }
}
