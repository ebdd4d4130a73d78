//! Named shared-memory segments.
//!
//! A [`SharedSegment`] maps a fixed-size named region. The creating handle owns
//! the OS object and removes it on drop; handles obtained with
//! [`SharedSegment::open`] only detach.
//!
//! Access is raw byte copying. Every request is bounds-checked before memory is
//! touched, and a rejected write leaves the segment unchanged. The segment does
//! no cross-process synchronization: processes sharing a segment agree on their
//! own protocol, such as the length-prefixed message helpers below.

#![allow(unsafe_code, reason = "copies bytes in and out of an OS mapping")]

use std::io;
use std::ptr;

use ipcwire_errors::{IpcError, IpcResult};
use shared_memory::{Shmem, ShmemConf, ShmemError};
use tracing::{debug, info};

use crate::naming::segment_os_id;

/// Size of the length field at offset 0 used by the message helpers.
pub const MESSAGE_HEADER_SIZE: usize = 4;

/// `ENOENT` on Unix and `ERROR_FILE_NOT_FOUND` on Windows share this value.
const OS_NOT_FOUND: u32 = 2;

/// A named, fixed-size shared memory region.
pub struct SharedSegment {
    shmem: Shmem,
    name: String,
    size: usize,
}

// SAFETY: `Shmem` owns the mapping for the lifetime of the segment, and every
// access goes through a raw copy into or out of caller-owned buffers.
unsafe impl Send for SharedSegment {}

// SAFETY: shared references only read through the mapping. Writing needs
// `&mut self`, so no two threads of this process write concurrently.
unsafe impl Sync for SharedSegment {}

impl std::fmt::Debug for SharedSegment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedSegment")
            .field("name", &self.name)
            .field("os_id", &self.os_id())
            .field("size", &self.size)
            .field("is_owner", &self.is_owner())
            .finish()
    }
}

impl SharedSegment {
    /// Create and own a new zero-filled segment of `size` bytes.
    ///
    /// # Errors
    ///
    /// - [`IpcError::InvalidConfig`] if `size` is zero
    /// - [`IpcError::InvalidName`] if the name is malformed
    /// - [`IpcError::NameConflict`] if a segment with this name already exists
    pub fn create(name: &str, size: usize) -> IpcResult<Self> {
        if size == 0 {
            return Err(IpcError::invalid_config("segment size must be greater than 0"));
        }
        let os_id = segment_os_id(name)?;

        let shmem = ShmemConf::new()
            .size(size)
            .os_id(&os_id)
            .create()
            .map_err(|e| match e {
                ShmemError::MappingIdExists | ShmemError::LinkExists => {
                    IpcError::name_conflict(name)
                }
                other => shmem_failure(&other),
            })?;

        info!("Created shared segment {} ({} bytes)", os_id, size);
        Ok(Self {
            shmem,
            name: name.to_string(),
            size,
        })
    }

    /// Attach to an existing segment without taking ownership.
    ///
    /// # Errors
    ///
    /// - [`IpcError::InvalidName`] if the name is malformed
    /// - [`IpcError::NotFound`] if no segment with this name exists
    pub fn open(name: &str) -> IpcResult<Self> {
        let os_id = segment_os_id(name)?;

        let shmem = ShmemConf::new().os_id(&os_id).open().map_err(|e| match e {
            ShmemError::MapOpenFailed(OS_NOT_FOUND) | ShmemError::LinkDoesNotExist => {
                IpcError::not_found(name)
            }
            other => shmem_failure(&other),
        })?;

        let size = shmem.len();
        debug!("Opened shared segment {} ({} bytes)", os_id, size);
        Ok(Self {
            shmem,
            name: name.to_string(),
            size,
        })
    }

    /// Name the segment was created or opened with.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Identifier of the backing OS object.
    pub fn os_id(&self) -> &str {
        self.shmem.get_os_id()
    }

    /// Mapped size in bytes.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Whether this handle created the segment and will remove it on drop.
    pub fn is_owner(&self) -> bool {
        self.shmem.is_owner()
    }

    fn check_bounds(&self, offset: usize, len: usize) -> IpcResult<()> {
        match offset.checked_add(len) {
            Some(end) if end <= self.size => Ok(()),
            _ => Err(IpcError::out_of_bounds(offset, len, self.size)),
        }
    }

    /// Copy `buf.len()` bytes starting at `offset` into `buf`.
    ///
    /// # Errors
    ///
    /// Returns [`IpcError::OutOfBounds`] if the range does not fit the segment.
    pub fn read_into(&self, offset: usize, buf: &mut [u8]) -> IpcResult<()> {
        self.check_bounds(offset, buf.len())?;
        let src = self.shmem.as_ptr().wrapping_add(offset);
        // SAFETY: `offset + buf.len() <= size` was checked above, so the source
        // range lies inside the mapping, and `buf` is a distinct caller allocation.
        unsafe { ptr::copy_nonoverlapping(src, buf.as_mut_ptr(), buf.len()) };
        Ok(())
    }

    /// Read `len` bytes starting at `offset`.
    ///
    /// # Errors
    ///
    /// Returns [`IpcError::OutOfBounds`] if the range does not fit the segment.
    pub fn read(&self, offset: usize, len: usize) -> IpcResult<Vec<u8>> {
        self.check_bounds(offset, len)?;
        let mut buf = vec![0u8; len];
        self.read_into(offset, &mut buf)?;
        Ok(buf)
    }

    /// Read the whole segment.
    pub fn read_all(&self) -> IpcResult<Vec<u8>> {
        self.read(0, self.size)
    }

    /// Write `data` starting at `offset`.
    ///
    /// # Errors
    ///
    /// Returns [`IpcError::OutOfBounds`] if the range does not fit the segment.
    /// Nothing is written in that case.
    pub fn write(&mut self, offset: usize, data: &[u8]) -> IpcResult<()> {
        self.check_bounds(offset, data.len())?;
        let dst = self.shmem.as_ptr().wrapping_add(offset);
        // SAFETY: `offset + data.len() <= size` was checked above, so the
        // destination range lies inside the mapping, and `data` cannot alias it.
        unsafe { ptr::copy_nonoverlapping(data.as_ptr(), dst, data.len()) };
        Ok(())
    }

    /// Publish `payload` using the length-prefix convention.
    ///
    /// The payload goes at offset [`MESSAGE_HEADER_SIZE`] first and the
    /// little-endian length at offset 0 last, so a reader polling the length
    /// never sees a partially written payload.
    ///
    /// # Errors
    ///
    /// Returns [`IpcError::OutOfBounds`] if the payload does not fit after the
    /// header, or [`IpcError::MessageTooLarge`] if its length does not fit in `u32`.
    pub fn write_message(&mut self, payload: &[u8]) -> IpcResult<()> {
        let Ok(len) = u32::try_from(payload.len()) else {
            return Err(IpcError::too_large(payload.len(), u32::MAX as usize));
        };
        self.write(MESSAGE_HEADER_SIZE, payload)?;
        self.write(0, &len.to_le_bytes())
    }

    /// Read the message published with [`write_message`](Self::write_message).
    ///
    /// Returns `None` when the length field is zero.
    ///
    /// # Errors
    ///
    /// Returns [`IpcError::OutOfBounds`] if the segment is smaller than the
    /// header or the recorded length overruns the segment.
    pub fn read_message(&self) -> IpcResult<Option<Vec<u8>>> {
        let mut header = [0u8; MESSAGE_HEADER_SIZE];
        self.read_into(0, &mut header)?;
        let len = u32::from_le_bytes(header) as usize;
        if len == 0 {
            return Ok(None);
        }
        self.read(MESSAGE_HEADER_SIZE, len).map(Some)
    }

    /// Mark the message slot empty by zeroing the length field.
    ///
    /// # Errors
    ///
    /// Returns [`IpcError::OutOfBounds`] if the segment is smaller than the header.
    pub fn clear_message(&mut self) -> IpcResult<()> {
        self.write(0, &[0u8; MESSAGE_HEADER_SIZE])
    }
}

impl Drop for SharedSegment {
    fn drop(&mut self) {
        if self.is_owner() {
            debug!("Releasing shared segment {}", self.os_id());
        }
    }
}

fn shmem_failure(err: &ShmemError) -> IpcError {
    IpcError::Io(io::Error::other(err.to_string()))
}
