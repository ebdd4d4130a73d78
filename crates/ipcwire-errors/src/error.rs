//! The error type returned by every fallible ipcwire operation.

use std::io;

use thiserror::Error;

use crate::kind::ErrorKind;

/// Error returned by channel, pipe, segment and lifecycle operations.
#[derive(Debug, Error)]
pub enum IpcError {
    /// A server or segment with this name already exists
    #[error("name already in use: {0}")]
    NameConflict(String),

    /// No server is listening on, or no segment exists under, this name
    #[error("no endpoint named {0}")]
    NotFound(String),

    /// The server exists but did not accept within the bounded wait
    #[error("timed out after {timeout_ms}ms connecting to {name}")]
    ConnectTimeout {
        /// Resolved name of the endpoint
        name: String,
        /// Timeout that elapsed, in milliseconds
        timeout_ms: u64,
    },

    /// The peer closed its end at a frame boundary
    #[error("peer closed the connection")]
    PeerClosed,

    /// The peer closed its end in the middle of a frame
    #[error("truncated frame: expected {expected} bytes, received {received}")]
    Truncated {
        /// Bytes the frame declared
        expected: usize,
        /// Bytes that arrived before end of stream
        received: usize,
    },

    /// A payload could not be decoded
    #[error("decode failed: {0}")]
    Decode(String),

    /// A value could not be encoded
    #[error("encode failed: {0}")]
    Encode(String),

    /// A segment access fell outside the mapped region
    #[error("access of {len} bytes at offset {offset} exceeds segment size {size}")]
    OutOfBounds {
        /// Requested start offset
        offset: usize,
        /// Requested length
        len: usize,
        /// Size of the segment
        size: usize,
    },

    /// The lifecycle coordinator is no longer accepting operations
    #[error("channel is shutting down")]
    ChannelShutdown,

    /// In-flight operations did not finish within the drain bound
    #[error("drain timed out after {timeout_ms}ms with {in_flight} operations in flight")]
    DrainTimeout {
        /// Bound that elapsed, in milliseconds
        timeout_ms: u64,
        /// Operations still running when the bound elapsed
        in_flight: usize,
    },

    /// A frame exceeds the configured size limit
    #[error("message of {size} bytes exceeds the {max} byte limit")]
    MessageTooLarge {
        /// Declared or actual payload size
        size: usize,
        /// Configured maximum
        max: usize,
    },

    /// A channel or segment name is malformed
    #[error("invalid name: {0}")]
    InvalidName(String),

    /// A configuration value was rejected
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The operation is not valid for this endpoint
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// The handle was closed locally
    #[error("endpoint is closed")]
    Closed,

    /// Unclassified OS failure
    #[error("I/O error: {0}")]
    Io(#[source] io::Error),
}

impl IpcError {
    /// Discriminant of this error, for matching without payloads.
    pub fn kind(&self) -> ErrorKind {
        match self {
            IpcError::NameConflict(_) => ErrorKind::NameConflict,
            IpcError::NotFound(_) => ErrorKind::NotFound,
            IpcError::ConnectTimeout { .. } => ErrorKind::ConnectTimeout,
            IpcError::PeerClosed => ErrorKind::PeerClosed,
            IpcError::Truncated { .. } => ErrorKind::Truncated,
            IpcError::Decode(_) => ErrorKind::Decode,
            IpcError::Encode(_) => ErrorKind::Encode,
            IpcError::OutOfBounds { .. } => ErrorKind::OutOfBounds,
            IpcError::ChannelShutdown => ErrorKind::ChannelShutdown,
            IpcError::DrainTimeout { .. } => ErrorKind::DrainTimeout,
            IpcError::MessageTooLarge { .. } => ErrorKind::MessageTooLarge,
            IpcError::InvalidName(_) => ErrorKind::InvalidName,
            IpcError::InvalidConfig(_) => ErrorKind::InvalidConfig,
            IpcError::InvalidState(_) => ErrorKind::InvalidState,
            IpcError::Closed => ErrorKind::Closed,
            IpcError::Io(_) => ErrorKind::Io,
        }
    }

    /// Check if retrying the same operation later may succeed
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            IpcError::NotFound(_)
                | IpcError::ConnectTimeout { .. }
                | IpcError::Decode(_)
                | IpcError::DrainTimeout { .. }
        )
    }

    /// Check if this error reports an elapsed bound
    pub fn is_timeout(&self) -> bool {
        matches!(
            self,
            IpcError::ConnectTimeout { .. } | IpcError::DrainTimeout { .. }
        )
    }

    /// Check if this error reports caller misuse rather than a runtime condition
    pub fn is_misuse(&self) -> bool {
        matches!(
            self,
            IpcError::InvalidName(_) | IpcError::InvalidConfig(_) | IpcError::InvalidState(_)
        )
    }

    /// Check if the peer side of a connection is gone
    pub fn is_disconnect(&self) -> bool {
        matches!(self, IpcError::PeerClosed | IpcError::Truncated { .. })
    }

    /// Classify an I/O error, mapping end-of-stream conditions to [`IpcError::PeerClosed`].
    pub fn from_io(err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::BrokenPipe
            | io::ErrorKind::ConnectionReset
            | io::ErrorKind::ConnectionAborted
            | io::ErrorKind::UnexpectedEof => IpcError::PeerClosed,
            _ => IpcError::Io(err),
        }
    }

    /// Create a name conflict error
    pub fn name_conflict(name: impl Into<String>) -> Self {
        IpcError::NameConflict(name.into())
    }

    /// Create a not found error
    pub fn not_found(name: impl Into<String>) -> Self {
        IpcError::NotFound(name.into())
    }

    /// Create a connect timeout error
    pub fn connect_timeout(name: impl Into<String>, timeout_ms: u64) -> Self {
        IpcError::ConnectTimeout {
            name: name.into(),
            timeout_ms,
        }
    }

    /// Create an out of bounds error
    pub fn out_of_bounds(offset: usize, len: usize, size: usize) -> Self {
        IpcError::OutOfBounds { offset, len, size }
    }

    /// Create a drain timeout error
    pub fn drain_timeout(timeout_ms: u64, in_flight: usize) -> Self {
        IpcError::DrainTimeout {
            timeout_ms,
            in_flight,
        }
    }

    /// Create a message size error
    pub fn too_large(size: usize, max: usize) -> Self {
        IpcError::MessageTooLarge { size, max }
    }

    /// Create an invalid name error
    pub fn invalid_name(msg: impl Into<String>) -> Self {
        IpcError::InvalidName(msg.into())
    }

    /// Create an invalid configuration error
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        IpcError::InvalidConfig(msg.into())
    }

    /// Create an invalid state error
    pub fn invalid_state(msg: impl Into<String>) -> Self {
        IpcError::InvalidState(msg.into())
    }
}

impl From<io::Error> for IpcError {
    fn from(err: io::Error) -> Self {
        IpcError::from_io(err)
    }
}

/// Specialized Result type for IPC operations
pub type IpcResult<T> = std::result::Result<T, IpcError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_is_recoverable() {
        assert!(IpcError::not_found("c1").is_recoverable());
        assert!(IpcError::connect_timeout("c1", 100).is_recoverable());
        assert!(!IpcError::ChannelShutdown.is_recoverable());
        assert!(!IpcError::PeerClosed.is_recoverable());
    }

    #[test]
    fn test_error_is_timeout() {
        assert!(IpcError::drain_timeout(100, 1).is_timeout());
        assert!(IpcError::connect_timeout("c1", 5).is_timeout());
        assert!(!IpcError::Closed.is_timeout());
    }

    #[test]
    fn test_misuse_classification() {
        assert!(IpcError::invalid_state("client cannot accept").is_misuse());
        assert!(IpcError::invalid_name("").is_misuse());
        assert!(!IpcError::Decode("eof".to_string()).is_misuse());
    }

    #[test]
    fn test_io_classification() {
        let err = IpcError::from(io::Error::from(io::ErrorKind::BrokenPipe));
        assert!(matches!(err, IpcError::PeerClosed));

        let err = IpcError::from(io::Error::from(io::ErrorKind::PermissionDenied));
        assert_eq!(err.kind(), ErrorKind::Io);
    }

    #[test]
    fn test_error_helpers() {
        let err = IpcError::out_of_bounds(90, 20, 100);
        assert!(matches!(
            err,
            IpcError::OutOfBounds {
                offset: 90,
                len: 20,
                size: 100
            }
        ));

        let err = IpcError::too_large(32, 16);
        assert!(matches!(err, IpcError::MessageTooLarge { size: 32, max: 16 }));
    }
}
