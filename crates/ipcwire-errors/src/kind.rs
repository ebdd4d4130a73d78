//! Payload-free error discriminants.

use core::fmt;

/// Copyable discriminant of an [`IpcError`](crate::IpcError).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ErrorKind {
    /// Name already in use
    NameConflict = 0,
    /// Endpoint missing
    NotFound = 1,
    /// Connect bound elapsed
    ConnectTimeout = 2,
    /// Peer closed at a frame boundary
    PeerClosed = 3,
    /// Peer closed inside a frame
    Truncated = 4,
    /// Payload decode failure
    Decode = 5,
    /// Payload encode failure
    Encode = 6,
    /// Segment bounds violation
    OutOfBounds = 7,
    /// Coordinator not accepting operations
    ChannelShutdown = 8,
    /// Drain bound elapsed
    DrainTimeout = 9,
    /// Frame over the size limit
    MessageTooLarge = 10,
    /// Malformed name
    InvalidName = 11,
    /// Rejected configuration
    InvalidConfig = 12,
    /// Operation invalid for this endpoint
    InvalidState = 13,
    /// Handle closed locally
    Closed = 14,
    /// Unclassified OS failure
    Io = 255,
}

impl ErrorKind {
    /// Stable snake_case label, used in machine-readable output.
    pub const fn as_str(self) -> &'static str {
        match self {
            ErrorKind::NameConflict => "name_conflict",
            ErrorKind::NotFound => "not_found",
            ErrorKind::ConnectTimeout => "connect_timeout",
            ErrorKind::PeerClosed => "peer_closed",
            ErrorKind::Truncated => "truncated",
            ErrorKind::Decode => "decode",
            ErrorKind::Encode => "encode",
            ErrorKind::OutOfBounds => "out_of_bounds",
            ErrorKind::ChannelShutdown => "channel_shutdown",
            ErrorKind::DrainTimeout => "drain_timeout",
            ErrorKind::MessageTooLarge => "message_too_large",
            ErrorKind::InvalidName => "invalid_name",
            ErrorKind::InvalidConfig => "invalid_config",
            ErrorKind::InvalidState => "invalid_state",
            ErrorKind::Closed => "closed",
            ErrorKind::Io => "io",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
