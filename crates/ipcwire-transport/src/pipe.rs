//! Named duplex byte pipe
//!
//! [`NamedPipe`] is the raw byte-stream layer: no message boundaries, no
//! framing. A server is created under a short name and becomes usable once
//! a client attaches; either [`NamedPipe::wait_for_client`] or the first
//! read or write performs that wait.

use std::io::{self, Read, Write};
use std::sync::Arc;
use std::time::Duration;

use ipcwire_errors::{IpcError, IpcResult};
use tracing::{debug, info};

use crate::codec::read_full;
use crate::config::{TransportConfig, TransportKind};
use crate::naming::resolve;
use crate::sys::{self, DuplexBackend, Link};
use crate::traits::{ByteStream, Endpoint, Role};

/// One end of a duplex byte pipe
#[derive(Debug)]
pub struct NamedPipe {
    short_name: String,
    resolved: String,
    role: Role,
    backend: Box<dyn DuplexBackend>,
}

impl NamedPipe {
    /// Create a server endpoint with the default configuration.
    ///
    /// # Errors
    ///
    /// - [`IpcError::InvalidName`] if `name` is rejected
    /// - [`IpcError::NameConflict`] if a live server already owns `name`
    pub fn create(name: &str) -> IpcResult<Self> {
        Self::create_with(name, &TransportConfig::default())
    }

    /// Create a server endpoint.
    ///
    /// # Errors
    ///
    /// See [`create`](Self::create). Also fails with
    /// [`IpcError::InvalidConfig`] for a rejected configuration.
    pub fn create_with(name: &str, config: &TransportConfig) -> IpcResult<Self> {
        config.validate()?;
        let resolved = resolve(name, config)?;
        let backend = sys::create(name, config)?;
        info!("Pipe server {} ready ({})", resolved, backend.kind().description());
        Ok(Self {
            short_name: name.to_string(),
            resolved,
            role: Role::Server,
            backend,
        })
    }

    /// Connect to a server using the configured connect timeout.
    ///
    /// # Errors
    ///
    /// - [`IpcError::NotFound`] if no server is live under `name`
    /// - [`IpcError::ConnectTimeout`] if the server never accepted in time
    pub fn connect(name: &str) -> IpcResult<Self> {
        Self::connect_with(name, &TransportConfig::default())
    }

    /// Connect to a server with an explicit configuration.
    ///
    /// # Errors
    ///
    /// See [`connect`](Self::connect).
    pub fn connect_with(name: &str, config: &TransportConfig) -> IpcResult<Self> {
        Self::connect_inner(name, config, config.connect_timeout())
    }

    /// Connect to a server, waiting at most `timeout`.
    ///
    /// # Errors
    ///
    /// See [`connect`](Self::connect).
    pub fn connect_timeout(name: &str, timeout: Duration) -> IpcResult<Self> {
        Self::connect_inner(name, &TransportConfig::default(), timeout)
    }

    fn connect_inner(name: &str, config: &TransportConfig, timeout: Duration) -> IpcResult<Self> {
        config.validate()?;
        let resolved = resolve(name, config)?;
        let backend = sys::connect(name, config, timeout)?;
        info!("Pipe client connected to {}", resolved);
        Ok(Self {
            short_name: name.to_string(),
            resolved,
            role: Role::Client,
            backend,
        })
    }

    /// Platform-resolved name. Always ends with the short name.
    pub fn name(&self) -> &str {
        &self.resolved
    }

    /// Name this endpoint was created or connected with
    pub fn short_name(&self) -> &str {
        &self.short_name
    }

    /// Which side this endpoint is
    pub fn role(&self) -> Role {
        self.role
    }

    /// Whether this endpoint is the server side
    pub fn is_server(&self) -> bool {
        self.role == Role::Server
    }

    /// Native primitive carrying this pipe
    pub fn kind(&self) -> TransportKind {
        self.backend.kind()
    }

    /// Block until a client attaches. Returns at once if one already has.
    ///
    /// # Errors
    ///
    /// - [`IpcError::InvalidState`] on a client endpoint
    /// - [`IpcError::Closed`] after [`close`](Self::close)
    pub fn wait_for_client(&self) -> IpcResult<()> {
        if self.role == Role::Client {
            return Err(IpcError::invalid_state(
                "wait_for_client called on a client endpoint",
            ));
        }
        self.backend.wait_for_client()
    }

    pub(crate) fn link(&self) -> IpcResult<Arc<Link>> {
        self.backend.link()
    }

    /// Read up to `max_len` bytes, blocking until at least one arrives.
    ///
    /// Returns an empty vector once the peer has closed its end, or when
    /// `max_len` is zero.
    ///
    /// # Errors
    ///
    /// Returns [`IpcError::Closed`] after [`close`](Self::close), or the
    /// transport failure.
    pub fn read(&self, max_len: usize) -> IpcResult<Vec<u8>> {
        if max_len == 0 {
            return Ok(Vec::new());
        }
        let link = self.link()?;
        let mut buf = vec![0u8; max_len];
        let n = loop {
            match (&link.reader).read(&mut buf) {
                Ok(n) => break n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => return Err(e.into()),
            }
        };
        buf.truncate(n);
        Ok(buf)
    }

    /// Read exactly `len` bytes.
    ///
    /// # Errors
    ///
    /// - [`IpcError::PeerClosed`] if the peer closed before any byte arrived
    /// - [`IpcError::Truncated`] if it closed part way through
    pub fn read_exact(&self, len: usize) -> IpcResult<Vec<u8>> {
        if len == 0 {
            return Ok(Vec::new());
        }
        let link = self.link()?;
        let mut buf = vec![0u8; len];
        match read_full(&mut &link.reader, &mut buf)? {
            0 => Err(IpcError::PeerClosed),
            n if n < len => Err(IpcError::Truncated {
                expected: len,
                received: n,
            }),
            _ => Ok(buf),
        }
    }

    /// Write every byte of `data`. An empty slice is a no-op.
    ///
    /// # Errors
    ///
    /// - [`IpcError::PeerClosed`] if the peer has gone
    /// - [`IpcError::Closed`] after [`close`](Self::close)
    pub fn write(&self, data: &[u8]) -> IpcResult<()> {
        let link = self.link()?;
        if data.is_empty() {
            return Ok(());
        }
        let mut writer = &link.writer;
        writer.write_all(data)?;
        writer.flush()?;
        Ok(())
    }

    /// Alias of [`write`](Self::write)
    ///
    /// # Errors
    ///
    /// See [`write`](Self::write).
    pub fn write_all(&self, data: &[u8]) -> IpcResult<()> {
        self.write(data)
    }

    /// Release the handles. Idempotent; later operations fail with
    /// [`IpcError::Closed`]. A server also removes its OS objects.
    pub fn close(&self) {
        if !self.backend.is_closed() {
            debug!("Closing pipe {}", self.resolved);
        }
        self.backend.close();
    }

    /// Whether [`close`](Self::close) has run
    pub fn is_closed(&self) -> bool {
        self.backend.is_closed()
    }
}

impl Endpoint for NamedPipe {
    fn name(&self) -> &str {
        NamedPipe::name(self)
    }

    fn role(&self) -> Role {
        self.role
    }

    fn wait_for_client(&self) -> IpcResult<()> {
        NamedPipe::wait_for_client(self)
    }
}

impl ByteStream for NamedPipe {
    fn read(&self, max_len: usize) -> IpcResult<Vec<u8>> {
        NamedPipe::read(self, max_len)
    }

    fn write(&self, data: &[u8]) -> IpcResult<()> {
        NamedPipe::write(self, data)
    }
}
