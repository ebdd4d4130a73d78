//! Unit tests for error classification.

use std::error::Error as _;
use std::io;

use ipcwire_errors::{ErrorKind, IpcError};

#[test]
fn test_kind_matches_variant() {
    let cases = [
        (IpcError::name_conflict("a"), ErrorKind::NameConflict),
        (IpcError::not_found("a"), ErrorKind::NotFound),
        (IpcError::connect_timeout("a", 1), ErrorKind::ConnectTimeout),
        (IpcError::PeerClosed, ErrorKind::PeerClosed),
        (
            IpcError::Truncated {
                expected: 4,
                received: 1,
            },
            ErrorKind::Truncated,
        ),
        (IpcError::Decode("x".into()), ErrorKind::Decode),
        (IpcError::Encode("x".into()), ErrorKind::Encode),
        (IpcError::out_of_bounds(1, 2, 2), ErrorKind::OutOfBounds),
        (IpcError::ChannelShutdown, ErrorKind::ChannelShutdown),
        (IpcError::drain_timeout(1, 1), ErrorKind::DrainTimeout),
        (IpcError::too_large(2, 1), ErrorKind::MessageTooLarge),
        (IpcError::invalid_name("a/b"), ErrorKind::InvalidName),
        (IpcError::invalid_config("size"), ErrorKind::InvalidConfig),
        (IpcError::invalid_state("client"), ErrorKind::InvalidState),
        (IpcError::Closed, ErrorKind::Closed),
    ];

    for (err, kind) in cases {
        assert_eq!(err.kind(), kind, "wrong kind for {err}");
    }
}

#[test]
fn test_end_of_stream_maps_to_peer_closed() {
    for kind in [
        io::ErrorKind::BrokenPipe,
        io::ErrorKind::ConnectionReset,
        io::ErrorKind::ConnectionAborted,
        io::ErrorKind::UnexpectedEof,
    ] {
        let err = IpcError::from(io::Error::from(kind));
        assert!(err.is_disconnect(), "{kind:?} should be a disconnect");
        assert_eq!(err.kind(), ErrorKind::PeerClosed);
    }
}

#[test]
fn test_io_error_keeps_source() {
    let err = IpcError::from(io::Error::other("disk on fire"));
    assert_eq!(err.kind(), ErrorKind::Io);
    assert!(err.source().is_some());
}

#[test]
fn test_kind_labels_are_snake_case() {
    assert_eq!(ErrorKind::ChannelShutdown.to_string(), "channel_shutdown");
    assert_eq!(ErrorKind::MessageTooLarge.as_str(), "message_too_large");
    assert_eq!(ErrorKind::Io.as_str(), "io");
}
