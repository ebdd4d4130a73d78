//! Framed message channel
//!
//! A [`Channel`] runs the [`FrameCodec`] over a [`NamedPipe`]. Each direction
//! has its own lock held for a whole frame, so concurrent senders never
//! interleave bytes and concurrent receivers never split a frame.

use std::time::Duration;

use ipcwire_errors::{IpcError, IpcResult};
use parking_lot::Mutex;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{trace, warn};

use crate::codec::{FrameCodec, decode_json, encode_json};
use crate::config::TransportConfig;
use crate::pipe::NamedPipe;
use crate::traits::{Endpoint, MessageTransport, Role};

/// Bidirectional message channel
#[derive(Debug)]
pub struct Channel {
    pipe: NamedPipe,
    codec: FrameCodec,
    send_lock: Mutex<()>,
    recv_lock: Mutex<()>,
}

impl Channel {
    /// Create a channel server with the default configuration.
    ///
    /// # Errors
    ///
    /// See [`NamedPipe::create`].
    pub fn create(name: &str) -> IpcResult<Self> {
        Self::create_with(name, &TransportConfig::default())
    }

    /// Create a channel server.
    ///
    /// # Errors
    ///
    /// See [`NamedPipe::create_with`].
    pub fn create_with(name: &str, config: &TransportConfig) -> IpcResult<Self> {
        let pipe = NamedPipe::create_with(name, config)?;
        Ok(Self::from_pipe(pipe, config))
    }

    /// Connect to a channel server with the default configuration.
    ///
    /// # Errors
    ///
    /// See [`NamedPipe::connect`].
    pub fn connect(name: &str) -> IpcResult<Self> {
        Self::connect_with(name, &TransportConfig::default())
    }

    /// Connect to a channel server.
    ///
    /// # Errors
    ///
    /// See [`NamedPipe::connect_with`].
    pub fn connect_with(name: &str, config: &TransportConfig) -> IpcResult<Self> {
        let pipe = NamedPipe::connect_with(name, config)?;
        Ok(Self::from_pipe(pipe, config))
    }

    /// Connect to a channel server, waiting at most `timeout`.
    ///
    /// # Errors
    ///
    /// See [`NamedPipe::connect_timeout`].
    pub fn connect_timeout(name: &str, timeout: Duration) -> IpcResult<Self> {
        let pipe = NamedPipe::connect_timeout(name, timeout)?;
        Ok(Self::from_pipe(pipe, &TransportConfig::default()))
    }

    fn from_pipe(pipe: NamedPipe, config: &TransportConfig) -> Self {
        Self {
            pipe,
            codec: FrameCodec::with_max_size(config.max_message_size),
            send_lock: Mutex::new(()),
            recv_lock: Mutex::new(()),
        }
    }

    /// Block until a client attaches.
    ///
    /// # Errors
    ///
    /// See [`NamedPipe::wait_for_client`].
    pub fn wait_for_client(&self) -> IpcResult<()> {
        self.pipe.wait_for_client()
    }

    /// Send one message.
    ///
    /// # Errors
    ///
    /// - [`IpcError::MessageTooLarge`](ipcwire_errors::IpcError::MessageTooLarge)
    ///   before anything is written
    /// - [`IpcError::PeerClosed`](ipcwire_errors::IpcError::PeerClosed) if the peer has gone
    pub fn send(&self, payload: &[u8]) -> IpcResult<()> {
        self.codec.check_size(payload.len())?;
        let link = self.pipe.link()?;
        let _sending = self.send_lock.lock();
        self.codec.write_frame(&mut &link.writer, payload)?;
        trace!("Sent {} byte message on {}", payload.len(), self.pipe.name());
        Ok(())
    }

    /// Receive the next message, blocking until a whole frame has arrived.
    ///
    /// # Errors
    ///
    /// - [`IpcError::PeerClosed`](ipcwire_errors::IpcError::PeerClosed) at a frame boundary
    /// - [`IpcError::Truncated`](ipcwire_errors::IpcError::Truncated) inside a frame
    /// - [`IpcError::MessageTooLarge`](ipcwire_errors::IpcError::MessageTooLarge)
    ///   for a declared length over the limit. The unread payload leaves the
    ///   stream without a frame boundary, so the channel is closed and later
    ///   calls fail with [`IpcError::Closed`].
    pub fn recv(&self) -> IpcResult<Vec<u8>> {
        let link = self.pipe.link()?;
        let _receiving = self.recv_lock.lock();
        let payload = match self.codec.read_frame(&mut &link.reader) {
            Ok(payload) => payload,
            Err(e @ IpcError::MessageTooLarge { .. }) => {
                warn!("Closing {} after oversized frame: {}", self.pipe.name(), e);
                self.pipe.close();
                return Err(e);
            }
            Err(e) => return Err(e),
        };
        trace!("Received {} byte message on {}", payload.len(), self.pipe.name());
        Ok(payload)
    }

    /// Serialize `value` as JSON and send it.
    ///
    /// # Errors
    ///
    /// `Encode` if serialization fails, otherwise see [`send`](Self::send).
    pub fn send_json<T: Serialize + ?Sized>(&self, value: &T) -> IpcResult<()> {
        self.send(&encode_json(value)?)
    }

    /// Receive one message and deserialize it from JSON.
    ///
    /// A malformed message is consumed and reported as `Decode`; the channel
    /// stays usable.
    ///
    /// # Errors
    ///
    /// `Decode` for malformed JSON, otherwise see [`recv`](Self::recv).
    pub fn recv_json<T: DeserializeOwned>(&self) -> IpcResult<T> {
        decode_json(&self.recv()?)
    }

    /// Platform-resolved name
    pub fn name(&self) -> &str {
        self.pipe.name()
    }

    /// Which side this endpoint is
    pub fn role(&self) -> Role {
        self.pipe.role()
    }

    /// Whether this endpoint is the server side
    pub fn is_server(&self) -> bool {
        self.pipe.is_server()
    }

    /// Underlying byte pipe
    pub fn pipe(&self) -> &NamedPipe {
        &self.pipe
    }

    /// Largest payload this channel sends or accepts
    pub fn max_message_size(&self) -> usize {
        self.codec.max_message_size()
    }

    /// Release the underlying pipe. Idempotent.
    pub fn close(&self) {
        self.pipe.close();
    }

    /// Whether [`close`](Self::close) has run
    pub fn is_closed(&self) -> bool {
        self.pipe.is_closed()
    }
}

impl MessageTransport for Channel {
    fn send(&self, payload: &[u8]) -> IpcResult<()> {
        Channel::send(self, payload)
    }

    fn recv(&self) -> IpcResult<Vec<u8>> {
        Channel::recv(self)
    }
}

impl Endpoint for Channel {
    fn name(&self) -> &str {
        self.pipe.name()
    }

    fn role(&self) -> Role {
        self.pipe.role()
    }

    fn wait_for_client(&self) -> IpcResult<()> {
        self.pipe.wait_for_client()
    }
}
