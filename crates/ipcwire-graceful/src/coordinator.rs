//! Shutdown coordinator and in-flight accounting
//!
//! The state and the in-flight count live under one mutex, so a shutdown
//! decision and the count it is based on can never disagree. The condition
//! variable is signalled whenever the count reaches zero.

use std::time::{Duration, Instant};

use ipcwire_errors::{IpcError, IpcResult};
use parking_lot::{Condvar, Mutex};
use tracing::{debug, info, warn};

use crate::state::ShutdownState;

#[derive(Debug, Default)]
struct Lifecycle {
    state: ShutdownState,
    in_flight: usize,
}

/// Tracks in-flight operations and gates new ones after shutdown
///
/// One coordinator can be shared by several wrapped transports through an
/// `Arc`, so a single [`shutdown`](Self::shutdown) stops all of them.
#[derive(Debug, Default)]
pub struct ShutdownCoordinator {
    lifecycle: Mutex<Lifecycle>,
    drained: Condvar,
}

impl ShutdownCoordinator {
    /// Create an active coordinator with nothing in flight
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new operation.
    ///
    /// The returned guard keeps the operation counted until it drops, on
    /// every exit path including unwinding.
    ///
    /// # Errors
    ///
    /// Returns [`IpcError::ChannelShutdown`] once shutdown has begun.
    pub fn begin_operation(&self) -> IpcResult<OperationGuard<'_>> {
        let mut lifecycle = self.lifecycle.lock();
        if !lifecycle.state.is_active() {
            return Err(IpcError::ChannelShutdown);
        }
        lifecycle.in_flight += 1;
        Ok(OperationGuard { coordinator: self })
    }

    fn end_operation(&self) {
        let mut lifecycle = self.lifecycle.lock();
        lifecycle.in_flight = lifecycle.in_flight.saturating_sub(1);
        if lifecycle.in_flight == 0 {
            if lifecycle.state == ShutdownState::ShuttingDown {
                lifecycle.state = ShutdownState::Shutdown;
                info!("Last in-flight operation finished, shutdown complete");
            }
            self.drained.notify_all();
        }
    }

    /// Stop accepting new operations.
    ///
    /// Only the first call performs the transition and returns `true`.
    pub fn shutdown(&self) -> bool {
        let mut lifecycle = self.lifecycle.lock();
        if !lifecycle.state.is_active() {
            debug!("Shutdown already requested ({})", lifecycle.state);
            return false;
        }

        let in_flight = lifecycle.in_flight;
        if in_flight == 0 {
            lifecycle.state = ShutdownState::Shutdown;
            self.drained.notify_all();
        } else {
            lifecycle.state = ShutdownState::ShuttingDown;
        }
        info!("Shutdown initiated with {} operations in flight", in_flight);
        true
    }

    /// Block until no operation is in flight.
    pub fn drain(&self) {
        let mut lifecycle = self.lifecycle.lock();
        while lifecycle.in_flight > 0 {
            self.drained.wait(&mut lifecycle);
        }
    }

    /// Block until no operation is in flight, or `timeout` elapses.
    ///
    /// # Errors
    ///
    /// Returns [`IpcError::DrainTimeout`] with the count still in flight.
    pub fn drain_timeout(&self, timeout: Duration) -> IpcResult<()> {
        let deadline = Instant::now() + timeout;
        let mut lifecycle = self.lifecycle.lock();
        while lifecycle.in_flight > 0 {
            if self.drained.wait_until(&mut lifecycle, deadline).timed_out()
                && lifecycle.in_flight > 0
            {
                let timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
                warn!(
                    "Drain timed out after {}ms with {} operations in flight",
                    timeout_ms, lifecycle.in_flight
                );
                return Err(IpcError::drain_timeout(timeout_ms, lifecycle.in_flight));
            }
        }
        Ok(())
    }

    /// [`shutdown`](Self::shutdown) then [`drain_timeout`](Self::drain_timeout).
    ///
    /// A timeout does not undo the shutdown.
    ///
    /// # Errors
    ///
    /// Returns [`IpcError::DrainTimeout`] if operations are still in flight
    /// when `timeout` elapses.
    pub fn shutdown_timeout(&self, timeout: Duration) -> IpcResult<()> {
        self.shutdown();
        self.drain_timeout(timeout)
    }

    /// Current lifecycle state
    pub fn state(&self) -> ShutdownState {
        self.lifecycle.lock().state
    }

    /// Whether shutdown has begun
    pub fn is_shutdown(&self) -> bool {
        !self.state().is_active()
    }

    /// Number of operations currently executing
    pub fn in_flight(&self) -> usize {
        self.lifecycle.lock().in_flight
    }
}

/// Keeps one operation counted as in flight until dropped
#[derive(Debug)]
#[must_use = "the operation stops being counted as soon as the guard drops"]
pub struct OperationGuard<'a> {
    coordinator: &'a ShutdownCoordinator,
}

impl Drop for OperationGuard<'_> {
    fn drop(&mut self) {
        self.coordinator.end_operation();
    }
}
