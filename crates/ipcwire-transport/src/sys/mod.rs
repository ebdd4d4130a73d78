//! Platform duplex backends
//!
//! Each backend turns a native primitive into a [`Link`]: one handle to read
//! from and one to write to. [`NamedPipe`](crate::NamedPipe) holds a boxed
//! [`DuplexBackend`] chosen at construction and never exposes which one.

use std::fmt;
use std::fs::File;
use std::sync::Arc;
use std::time::Duration;

use ipcwire_errors::{IpcError, IpcResult};
use parking_lot::Mutex;

use crate::config::{TransportConfig, TransportKind};

#[cfg(unix)]
mod fifo;
#[cfg(windows)]
mod named_pipe;

/// An established connection's handles.
#[derive(Debug)]
pub(crate) struct Link {
    pub(crate) reader: File,
    pub(crate) writer: File,
}

/// Native duplex primitive behind a pipe endpoint.
pub(crate) trait DuplexBackend: Send + Sync + fmt::Debug {
    /// Primitive in use.
    fn kind(&self) -> TransportKind;

    /// Block until the peer attaches. Only called on servers.
    fn wait_for_client(&self) -> IpcResult<()>;

    /// The established link, accepting the client first on a server.
    fn link(&self) -> IpcResult<Arc<Link>>;

    /// Release the link and any OS objects this endpoint owns.
    fn close(&self);

    /// Whether [`close`](Self::close) has run.
    fn is_closed(&self) -> bool;
}

/// Connection state shared by the backends.
#[derive(Debug)]
pub(crate) enum LinkState {
    Pending,
    Open(Arc<Link>),
    Closed,
}

/// A [`LinkState`] behind a lock, plus the lock serializing accepts.
#[derive(Debug)]
pub(crate) struct LinkSlot {
    state: Mutex<LinkState>,
    accept: Mutex<()>,
}

impl LinkSlot {
    pub(crate) fn pending() -> Self {
        Self {
            state: Mutex::new(LinkState::Pending),
            accept: Mutex::new(()),
        }
    }

    pub(crate) fn open(link: Link) -> Self {
        Self {
            state: Mutex::new(LinkState::Open(Arc::new(link))),
            accept: Mutex::new(()),
        }
    }

    /// The current link, `None` while still pending.
    pub(crate) fn current(&self) -> IpcResult<Option<Arc<Link>>> {
        match &*self.state.lock() {
            LinkState::Open(link) => Ok(Some(Arc::clone(link))),
            LinkState::Pending => Ok(None),
            LinkState::Closed => Err(IpcError::Closed),
        }
    }

    /// Run `establish` once, unless another caller already connected.
    ///
    /// The state lock is not held while `establish` blocks, so `close` and
    /// other readers stay responsive.
    pub(crate) fn accept_with<F>(&self, establish: F) -> IpcResult<Arc<Link>>
    where
        F: FnOnce() -> IpcResult<Link>,
    {
        let _accepting = self.accept.lock();
        if let Some(link) = self.current()? {
            return Ok(link);
        }

        let link = Arc::new(establish()?);
        let mut state = self.state.lock();
        if matches!(*state, LinkState::Closed) {
            return Err(IpcError::Closed);
        }
        *state = LinkState::Open(Arc::clone(&link));
        Ok(link)
    }

    /// Mark closed, dropping this slot's reference to the link.
    ///
    /// If the slot was still pending, `wake` is called to release an accept
    /// blocked in another thread. Its return value is held until that accept
    /// has given up, so it can carry handles the accept needs to return.
    pub(crate) fn close_with<W>(&self, wake: impl FnOnce() -> W) -> bool {
        let previous = std::mem::replace(&mut *self.state.lock(), LinkState::Closed);
        if matches!(previous, LinkState::Pending) {
            let waker = wake();
            drop(self.accept.lock());
            drop(waker);
        }
        !matches!(previous, LinkState::Closed)
    }

    pub(crate) fn is_closed(&self) -> bool {
        matches!(&*self.state.lock(), LinkState::Closed)
    }
}

/// Create a server endpoint for `name`.
pub(crate) fn create(name: &str, config: &TransportConfig) -> IpcResult<Box<dyn DuplexBackend>> {
    #[cfg(unix)]
    {
        Ok(Box::new(fifo::FifoEndpoint::create(name, config)?))
    }
    #[cfg(windows)]
    {
        Ok(Box::new(named_pipe::PipeEndpoint::create(name, config)?))
    }
}

/// Connect a client endpoint to `name`, waiting at most `timeout`.
pub(crate) fn connect(
    name: &str,
    config: &TransportConfig,
    timeout: Duration,
) -> IpcResult<Box<dyn DuplexBackend>> {
    #[cfg(unix)]
    {
        Ok(Box::new(fifo::FifoEndpoint::connect(name, config, timeout)?))
    }
    #[cfg(windows)]
    {
        Ok(Box::new(named_pipe::PipeEndpoint::connect(
            name, config, timeout,
        )?))
    }
}
