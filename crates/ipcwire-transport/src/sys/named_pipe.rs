//! Duplex channel over a single Windows named pipe instance
//!
//! The server creates exactly one instance with `FILE_FLAG_FIRST_PIPE_INSTANCE`
//! so a second server on the same name fails instead of silently sharing it.
//! Reads and writes use synchronous handles, so a read and a write issued
//! concurrently on one endpoint are serialized by the kernel.
#![allow(unsafe_code, reason = "named pipe creation goes through Win32 FFI")]

use std::fs::{File, OpenOptions};
use std::io;
use std::os::windows::io::{AsRawHandle, FromRawHandle};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use ipcwire_errors::{IpcError, IpcResult};
use parking_lot::Mutex;
use tracing::{debug, info};
use windows::Win32::Foundation::{ERROR_PIPE_CONNECTED, HANDLE};
use windows::Win32::Storage::FileSystem::{FILE_FLAG_FIRST_PIPE_INSTANCE, PIPE_ACCESS_DUPLEX};
use windows::Win32::System::Pipes::{
    ConnectNamedPipe, CreateNamedPipeW, PIPE_READMODE_BYTE, PIPE_REJECT_REMOTE_CLIENTS,
    PIPE_TYPE_BYTE, PIPE_WAIT,
};
use windows::core::HSTRING;

use super::{DuplexBackend, Link, LinkSlot};
use crate::config::{TransportConfig, TransportKind};
use crate::naming::pipe_path;

const ERROR_FILE_NOT_FOUND: i32 = 2;
const ERROR_ACCESS_DENIED: i32 = 5;
const ERROR_PIPE_BUSY: i32 = 231;

/// One side of a named pipe channel.
#[derive(Debug)]
pub(crate) struct PipeEndpoint {
    path: String,
    slot: LinkSlot,
    /// Server instance before a client connects.
    instance: Mutex<Option<File>>,
}

impl PipeEndpoint {
    pub(crate) fn create(name: &str, config: &TransportConfig) -> IpcResult<Self> {
        let path = pipe_path(name, config)?;
        let wide = HSTRING::from(path.as_str());

        // SAFETY: `wide` outlives the call and no security attributes are passed.
        let handle = unsafe {
            CreateNamedPipeW(
                &wide,
                PIPE_ACCESS_DUPLEX | FILE_FLAG_FIRST_PIPE_INSTANCE,
                PIPE_TYPE_BYTE | PIPE_READMODE_BYTE | PIPE_WAIT | PIPE_REJECT_REMOTE_CLIENTS,
                1,
                config.pipe_buffer_size,
                config.pipe_buffer_size,
                0,
                None,
            )
        };
        if handle.is_invalid() {
            let err = io::Error::last_os_error();
            return Err(match err.raw_os_error() {
                Some(ERROR_ACCESS_DENIED) => IpcError::name_conflict(name),
                _ => err.into(),
            });
        }

        // SAFETY: `handle` is a valid pipe handle owned by nobody else.
        let instance = unsafe { File::from_raw_handle(handle.0) };
        info!("Created named pipe {}", path);
        Ok(Self {
            path,
            slot: LinkSlot::pending(),
            instance: Mutex::new(Some(instance)),
        })
    }

    pub(crate) fn connect(
        name: &str,
        config: &TransportConfig,
        timeout: Duration,
    ) -> IpcResult<Self> {
        let path = pipe_path(name, config)?;
        let deadline = Instant::now() + timeout;
        let poll = config.poll_interval();

        let file = loop {
            match OpenOptions::new().read(true).write(true).open(&path) {
                Ok(file) => break file,
                Err(e) if e.raw_os_error() == Some(ERROR_FILE_NOT_FOUND) => {
                    return Err(IpcError::not_found(name));
                }
                Err(e) if e.raw_os_error() == Some(ERROR_PIPE_BUSY) => {
                    debug!("Named pipe {} is busy, retrying", path);
                }
                Err(e) => return Err(e.into()),
            }
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                let timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
                return Err(IpcError::connect_timeout(path, timeout_ms));
            }
            thread::sleep(poll.min(remaining));
        };

        let writer = file.try_clone()?;
        info!("Connected to named pipe {}", path);
        Ok(Self {
            path,
            slot: LinkSlot::open(Link {
                reader: file,
                writer,
            }),
            instance: Mutex::new(None),
        })
    }

    fn accept(&self) -> IpcResult<Arc<Link>> {
        self.slot.accept_with(|| {
            let Some(file) = self.instance.lock().take() else {
                return Err(IpcError::Closed);
            };
            debug!("Waiting for client on {}", self.path);

            // SAFETY: the handle stays open for the duration of the call because
            // `file` is owned by this closure.
            let connected = unsafe { ConnectNamedPipe(HANDLE(file.as_raw_handle()), None) };
            if let Err(e) = connected {
                if e.code() != ERROR_PIPE_CONNECTED.to_hresult() {
                    return Err(io::Error::from(e).into());
                }
            }

            let writer = file.try_clone()?;
            info!("Client attached to {}", self.path);
            Ok(Link {
                reader: file,
                writer,
            })
        })
    }
}

impl DuplexBackend for PipeEndpoint {
    fn kind(&self) -> TransportKind {
        TransportKind::NamedPipe
    }

    fn wait_for_client(&self) -> IpcResult<()> {
        self.accept().map(drop)
    }

    fn link(&self) -> IpcResult<Arc<Link>> {
        match self.slot.current()? {
            Some(link) => Ok(link),
            None => self.accept(),
        }
    }

    fn close(&self) {
        // Attaching as a client completes a ConnectNamedPipe blocked in another thread.
        let wake = || OpenOptions::new().read(true).write(true).open(&self.path).ok();
        if self.slot.close_with(wake) {
            debug!("Closing named pipe {}", self.path);
        }
        drop(self.instance.lock().take());
    }

    fn is_closed(&self) -> bool {
        self.slot.is_closed()
    }
}

impl Drop for PipeEndpoint {
    fn drop(&mut self) {
        self.close();
    }
}
