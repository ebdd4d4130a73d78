//! Length-prefixed message framing
//!
//! A frame is a 4-byte little-endian payload length followed by exactly that
//! many payload bytes. Frames follow each other with no separator.

use std::io::{self, Read, Write};

use ipcwire_errors::{IpcError, IpcResult};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::MAX_MESSAGE_SIZE;

/// Payloads up to this size are sent with a single write.
const COALESCE_LIMIT: usize = 64 * 1024;

/// Upper bound on the allocation made before payload bytes arrive.
const INITIAL_READ_CAPACITY: usize = 64 * 1024;

/// Wire frame header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHeader {
    /// Payload length
    pub payload_len: u32,
}

impl FrameHeader {
    /// Header size in bytes
    pub const SIZE: usize = 4;

    /// Create a header for a payload of `payload_len` bytes
    pub fn new(payload_len: u32) -> Self {
        Self { payload_len }
    }

    /// Encode the header to bytes
    pub fn encode(&self) -> [u8; Self::SIZE] {
        self.payload_len.to_le_bytes()
    }

    /// Decode a header from bytes.
    ///
    /// # Errors
    ///
    /// Returns [`IpcError::Truncated`] if fewer than [`Self::SIZE`] bytes are given.
    pub fn decode(bytes: &[u8]) -> IpcResult<Self> {
        let Some(prefix) = bytes.first_chunk::<{ FrameHeader::SIZE }>() else {
            return Err(IpcError::Truncated {
                expected: Self::SIZE,
                received: bytes.len(),
            });
        };
        Ok(Self {
            payload_len: u32::from_le_bytes(*prefix),
        })
    }
}

/// Frame codec with a payload size limit
#[derive(Debug, Clone, Copy)]
pub struct FrameCodec {
    max_message_size: usize,
}

impl FrameCodec {
    /// Create a codec with the default 16 MiB limit
    pub fn new() -> Self {
        Self {
            max_message_size: MAX_MESSAGE_SIZE,
        }
    }

    /// Create a codec with a custom limit, capped at `u32::MAX`
    pub fn with_max_size(max_message_size: usize) -> Self {
        Self {
            max_message_size: max_message_size.min(u32::MAX as usize),
        }
    }

    /// Get the maximum payload size
    pub fn max_message_size(&self) -> usize {
        self.max_message_size
    }

    /// Check a payload size against the limit.
    ///
    /// # Errors
    ///
    /// Returns [`IpcError::MessageTooLarge`] if `size` exceeds the limit.
    pub fn check_size(&self, size: usize) -> IpcResult<()> {
        if size > self.max_message_size {
            return Err(IpcError::too_large(size, self.max_message_size));
        }
        Ok(())
    }

    fn header_for(&self, payload: &[u8]) -> IpcResult<FrameHeader> {
        self.check_size(payload.len())?;
        let Ok(len) = u32::try_from(payload.len()) else {
            return Err(IpcError::too_large(payload.len(), self.max_message_size));
        };
        Ok(FrameHeader::new(len))
    }

    /// Encode one payload into a complete frame.
    ///
    /// # Errors
    ///
    /// Returns [`IpcError::MessageTooLarge`] if the payload exceeds the limit.
    pub fn encode(&self, payload: &[u8]) -> IpcResult<Vec<u8>> {
        let header = self.header_for(payload)?;
        let mut frame = Vec::with_capacity(FrameHeader::SIZE + payload.len());
        frame.extend_from_slice(&header.encode());
        frame.extend_from_slice(payload);
        Ok(frame)
    }

    /// Decode the first complete frame in `buf`.
    ///
    /// Returns the payload and the number of bytes consumed, or `None` if
    /// `buf` does not yet hold a whole frame.
    ///
    /// # Errors
    ///
    /// Returns [`IpcError::MessageTooLarge`] if the declared length exceeds the limit.
    pub fn decode<'a>(&self, buf: &'a [u8]) -> IpcResult<Option<(&'a [u8], usize)>> {
        let Ok(header) = FrameHeader::decode(buf) else {
            return Ok(None);
        };
        let len = header.payload_len as usize;
        self.check_size(len)?;
        let end = FrameHeader::SIZE + len;
        Ok(buf.get(FrameHeader::SIZE..end).map(|payload| (payload, end)))
    }

    /// Write one frame.
    ///
    /// # Errors
    ///
    /// Returns [`IpcError::MessageTooLarge`] before writing anything if the
    /// payload exceeds the limit, or the write failure.
    pub fn write_frame<W: Write + ?Sized>(&self, writer: &mut W, payload: &[u8]) -> IpcResult<()> {
        let header = self.header_for(payload)?;
        if payload.len() <= COALESCE_LIMIT {
            let mut frame = Vec::with_capacity(FrameHeader::SIZE + payload.len());
            frame.extend_from_slice(&header.encode());
            frame.extend_from_slice(payload);
            writer.write_all(&frame)?;
        } else {
            writer.write_all(&header.encode())?;
            writer.write_all(payload)?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Read one frame, growing the buffer as payload bytes arrive.
    ///
    /// # Errors
    ///
    /// - [`IpcError::PeerClosed`] if the stream ends before the first header byte
    /// - [`IpcError::Truncated`] if it ends inside the header or payload
    /// - [`IpcError::MessageTooLarge`] if the declared length exceeds the limit
    pub fn read_frame<R: Read + ?Sized>(&self, reader: &mut R) -> IpcResult<Vec<u8>> {
        let mut prefix = [0u8; FrameHeader::SIZE];
        match read_full(reader, &mut prefix)? {
            0 => return Err(IpcError::PeerClosed),
            n if n < FrameHeader::SIZE => {
                return Err(IpcError::Truncated {
                    expected: FrameHeader::SIZE,
                    received: n,
                });
            }
            _ => {}
        }

        let len = FrameHeader::decode(&prefix)?.payload_len as usize;
        self.check_size(len)?;

        let mut payload = Vec::with_capacity(len.min(INITIAL_READ_CAPACITY));
        let received = Read::take(&mut *reader, len as u64).read_to_end(&mut payload)?;
        if received < len {
            return Err(IpcError::Truncated {
                expected: len,
                received,
            });
        }
        Ok(payload)
    }
}

impl Default for FrameCodec {
    fn default() -> Self {
        Self::new()
    }
}

/// Fill `buf` until it is full or the stream ends, returning the bytes read.
pub(crate) fn read_full<R: Read + ?Sized>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        let Some(rest) = buf.get_mut(filled..) else {
            break;
        };
        match reader.read(rest) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

/// Serialize a value to JSON bytes.
///
/// # Errors
///
/// Returns [`IpcError::Encode`] if the value cannot be serialized.
pub fn encode_json<T: Serialize + ?Sized>(value: &T) -> IpcResult<Vec<u8>> {
    serde_json::to_vec(value).map_err(|e| IpcError::Encode(e.to_string()))
}

/// Deserialize a value from JSON bytes.
///
/// # Errors
///
/// Returns [`IpcError::Decode`] if the bytes are not valid JSON for `T`.
pub fn decode_json<T: DeserializeOwned>(bytes: &[u8]) -> IpcResult<T> {
    serde_json::from_slice(bytes).map_err(|e| IpcError::Decode(e.to_string()))
}
