//! Capability traits shared by pipes, channels and their wrappers

use core::fmt;

use ipcwire_errors::IpcResult;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::codec::{decode_json, encode_json};

/// Which side of a channel an endpoint is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// Created the channel and accepts the client
    Server,
    /// Connected to an existing server
    Client,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Server => write!(f, "server"),
            Role::Client => write!(f, "client"),
        }
    }
}

/// A named endpoint with a role
pub trait Endpoint {
    /// Platform-resolved name
    fn name(&self) -> &str;

    /// Which side this endpoint is
    fn role(&self) -> Role;

    /// Block until a client attaches. Servers only.
    ///
    /// # Errors
    ///
    /// Fails with [`IpcError::InvalidState`](ipcwire_errors::IpcError::InvalidState)
    /// when called on a client.
    fn wait_for_client(&self) -> IpcResult<()>;

    /// Whether this endpoint is the server side
    fn is_server(&self) -> bool {
        self.role() == Role::Server
    }
}

/// Raw byte stream access
pub trait ByteStream {
    /// Read up to `max_len` bytes, blocking until at least one byte arrives.
    /// An empty result means the peer closed its end.
    ///
    /// # Errors
    ///
    /// Returns the transport failure.
    fn read(&self, max_len: usize) -> IpcResult<Vec<u8>>;

    /// Write every byte of `data`.
    ///
    /// # Errors
    ///
    /// Returns the transport failure.
    fn write(&self, data: &[u8]) -> IpcResult<()>;
}

/// Discrete message exchange
pub trait MessageTransport {
    /// Send one message.
    ///
    /// # Errors
    ///
    /// Returns the transport or framing failure.
    fn send(&self, payload: &[u8]) -> IpcResult<()>;

    /// Receive the next message.
    ///
    /// # Errors
    ///
    /// Returns the transport or framing failure.
    fn recv(&self) -> IpcResult<Vec<u8>>;

    /// Serialize `value` as JSON and send it as one message.
    ///
    /// # Errors
    ///
    /// Fails with `Encode` if serialization fails, or with the send failure.
    fn send_json<T: Serialize + ?Sized>(&self, value: &T) -> IpcResult<()>
    where
        Self: Sized,
    {
        self.send(&encode_json(value)?)
    }

    /// Receive one message and deserialize it from JSON.
    ///
    /// # Errors
    ///
    /// Fails with `Decode` on malformed JSON, or with the receive failure.
    fn recv_json<T: DeserializeOwned>(&self) -> IpcResult<T>
    where
        Self: Sized,
    {
        decode_json(&self.recv()?)
    }
}
