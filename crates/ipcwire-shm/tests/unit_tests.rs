//! Unit tests for shared-memory segments.

mod common;

use common::unique_name;
use ipcwire_errors::{ErrorKind, IpcError};
use ipcwire_shm::{MESSAGE_HEADER_SIZE, SharedSegment};

type TestResult = Result<(), Box<dyn std::error::Error>>;

#[test]
fn test_write_then_read_back() -> TestResult {
    let mut segment = SharedSegment::create(&unique_name("rw"), 1024)?;
    segment.write(0, b"Hello, Shared Memory!")?;
    assert_eq!(segment.read(0, 21)?, b"Hello, Shared Memory!");
    Ok(())
}

#[test]
fn test_new_segment_is_zeroed() -> TestResult {
    let segment = SharedSegment::create(&unique_name("zero"), 128)?;
    assert!(segment.read_all()?.iter().all(|b| *b == 0));
    Ok(())
}

#[test]
fn test_opener_sees_owner_writes() -> TestResult {
    let name = unique_name("share");
    let mut owner = SharedSegment::create(&name, 1024)?;
    owner.write(0, b"Hello, Shared Memory!")?;

    let peer = SharedSegment::open(&name)?;
    assert!(owner.is_owner());
    assert!(!peer.is_owner());
    assert!(peer.size() >= 1024);
    assert_eq!(peer.read(0, 21)?, b"Hello, Shared Memory!");
    Ok(())
}

#[test]
fn test_peer_writes_are_visible_to_owner() -> TestResult {
    let name = unique_name("back");
    let owner = SharedSegment::create(&name, 256)?;
    let mut peer = SharedSegment::open(&name)?;

    peer.write(100, b"pong")?;
    assert_eq!(owner.read(100, 4)?, b"pong");
    Ok(())
}

#[test]
fn test_write_past_end_is_rejected_without_mutation() -> TestResult {
    let mut segment = SharedSegment::create(&unique_name("oob"), 100)?;
    segment.write(80, &[7u8; 20])?;

    let err = segment
        .write(90, &[1u8; 20])
        .err()
        .ok_or("write past the end succeeded")?;
    assert!(matches!(
        err,
        IpcError::OutOfBounds {
            offset: 90,
            len: 20,
            size: 100
        }
    ));
    assert_eq!(segment.read(80, 20)?, vec![7u8; 20]);
    Ok(())
}

#[test]
fn test_read_past_end_is_rejected() -> TestResult {
    let segment = SharedSegment::create(&unique_name("roob"), 100)?;
    let err = segment.read(99, 2).err().ok_or("read past the end succeeded")?;
    assert_eq!(err.kind(), ErrorKind::OutOfBounds);

    let mut buf = [0u8; 8];
    assert!(segment.read_into(96, &mut buf).is_err());
    assert!(segment.read_into(92, &mut buf).is_ok());
    Ok(())
}

#[test]
fn test_exact_fit_is_accepted() -> TestResult {
    let mut segment = SharedSegment::create(&unique_name("fit"), 16)?;
    segment.write(0, &[9u8; 16])?;
    segment.write(16, &[])?;
    assert_eq!(segment.read_all()?, vec![9u8; 16]);
    Ok(())
}

#[test]
fn test_duplicate_create_conflicts() -> TestResult {
    let name = unique_name("dup");
    let _owner = SharedSegment::create(&name, 64)?;
    let err = SharedSegment::create(&name, 64)
        .err()
        .ok_or("second create succeeded")?;
    assert_eq!(err.kind(), ErrorKind::NameConflict);
    Ok(())
}

#[test]
fn test_open_missing_is_not_found() -> TestResult {
    let err = SharedSegment::open(&unique_name("missing"))
        .err()
        .ok_or("opened a segment that was never created")?;
    assert_eq!(err.kind(), ErrorKind::NotFound);
    Ok(())
}

#[cfg(unix)]
#[test]
fn test_owner_drop_removes_segment() -> TestResult {
    let name = unique_name("gone");
    let owner = SharedSegment::create(&name, 64)?;
    drop(owner);

    let err = SharedSegment::open(&name)
        .err()
        .ok_or("segment outlived its owner")?;
    assert_eq!(err.kind(), ErrorKind::NotFound);
    Ok(())
}

#[test]
fn test_opener_drop_keeps_segment() -> TestResult {
    let name = unique_name("stay");
    let mut owner = SharedSegment::create(&name, 64)?;
    owner.write(0, b"kept")?;

    drop(SharedSegment::open(&name)?);
    let again = SharedSegment::open(&name)?;
    assert_eq!(again.read(0, 4)?, b"kept");
    Ok(())
}

#[test]
fn test_invalid_names() {
    for name in ["", "a/b", "sp ace", "nul\0"] {
        let result = SharedSegment::create(name, 64);
        assert!(
            matches!(result, Err(IpcError::InvalidName(_))),
            "{name:?} was accepted"
        );
    }
}

#[test]
fn test_message_convention() -> TestResult {
    let name = unique_name("msg");
    let mut writer = SharedSegment::create(&name, 256)?;
    let reader = SharedSegment::open(&name)?;

    assert_eq!(reader.read_message()?, None);

    writer.write_message(b"frame one")?;
    assert_eq!(reader.read_message()?, Some(b"frame one".to_vec()));
    assert_eq!(reader.read(0, MESSAGE_HEADER_SIZE)?, 9u32.to_le_bytes());

    writer.clear_message()?;
    assert_eq!(reader.read_message()?, None);
    Ok(())
}

#[test]
fn test_message_too_big_for_segment() -> TestResult {
    let mut segment = SharedSegment::create(&unique_name("big"), 16)?;
    let err = segment
        .write_message(&[0u8; 13])
        .err()
        .ok_or("oversized message accepted")?;
    assert_eq!(err.kind(), ErrorKind::OutOfBounds);
    assert_eq!(segment.read_message()?, None);
    Ok(())
}
