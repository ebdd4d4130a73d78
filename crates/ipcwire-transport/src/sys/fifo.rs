//! Duplex channel over a pair of FIFOs
//!
//! For a channel stem `<dir>/<ns>-<name>` the server creates:
//!
//! - `<stem>.c2s`: FIFO the client writes and the server reads
//! - `<stem>.s2c`: FIFO the server writes and the client reads
//! - `<stem>.srv.lock`: held exclusively by the live server
//! - `<stem>.cli.lock`: held exclusively by the connected client
//!
//! The server lock gives liveness and conflict detection without a registry:
//! a second server cannot take it, and a client that can take a shared lock
//! knows nobody is serving. The stale files of a crashed server are
//! reclaimed by the next `create`.

use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::io;
use std::os::unix::fs::OpenOptionsExt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use fs2::FileExt;
use ipcwire_errors::{IpcError, IpcResult};
use nix::errno::Errno;
use nix::sys::stat::Mode;
use nix::unistd::mkfifo;
use parking_lot::Mutex;
use tracing::{debug, info, warn};

use super::{DuplexBackend, Link, LinkSlot};
use crate::config::{TransportConfig, TransportKind};
use crate::naming::fifo_stem;

/// File set belonging to one channel.
#[derive(Debug, Clone)]
struct FifoPaths {
    to_server: PathBuf,
    to_client: PathBuf,
    server_lock: PathBuf,
    client_lock: PathBuf,
}

impl FifoPaths {
    fn new(stem: &Path) -> Self {
        let with_suffix = |suffix: &str| {
            let mut path = OsString::from(stem.as_os_str());
            path.push(suffix);
            PathBuf::from(path)
        };
        Self {
            to_server: with_suffix(".c2s"),
            to_client: with_suffix(".s2c"),
            server_lock: with_suffix(".srv.lock"),
            client_lock: with_suffix(".cli.lock"),
        }
    }

    fn fifos(&self) -> [&Path; 2] {
        [&self.to_server, &self.to_client]
    }
}

/// Files a server owns. Dropping this removes them and releases the server lock.
#[derive(Debug)]
struct ServerFiles {
    paths: FifoPaths,
    _lock: File,
}

impl Drop for ServerFiles {
    fn drop(&mut self) {
        for path in [
            &self.paths.to_server,
            &self.paths.to_client,
            &self.paths.client_lock,
            &self.paths.server_lock,
        ] {
            if let Err(e) = fs::remove_file(path) {
                if e.kind() != io::ErrorKind::NotFound {
                    warn!("Failed to remove {}: {}", path.display(), e);
                }
            }
        }
        debug!("Removed FIFO files for {}", self.paths.to_server.display());
    }
}

/// One side of a FIFO-pair channel.
#[derive(Debug)]
pub(crate) struct FifoEndpoint {
    paths: FifoPaths,
    slot: LinkSlot,
    server_files: Mutex<Option<ServerFiles>>,
    client_lock: Mutex<Option<File>>,
}

impl FifoEndpoint {
    pub(crate) fn create(name: &str, config: &TransportConfig) -> IpcResult<Self> {
        let stem = fifo_stem(name, config)?;
        let paths = FifoPaths::new(&stem);

        let lock = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .mode(0o600)
            .open(&paths.server_lock)?;
        if let Err(e) = FileExt::try_lock_exclusive(&lock) {
            return Err(if is_contended(&e) {
                IpcError::name_conflict(name)
            } else {
                e.into()
            });
        }

        for fifo in paths.fifos() {
            match fs::remove_file(fifo) {
                Ok(()) => warn!("Reclaimed stale FIFO {}", fifo.display()),
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
            mkfifo(fifo, Mode::S_IRUSR | Mode::S_IWUSR).map_err(|errno| match errno {
                Errno::EEXIST => IpcError::name_conflict(name),
                other => IpcError::from(io::Error::from(other)),
            })?;
        }

        info!("Created FIFO channel {}", stem.display());
        Ok(Self {
            server_files: Mutex::new(Some(ServerFiles {
                paths: paths.clone(),
                _lock: lock,
            })),
            paths,
            slot: LinkSlot::pending(),
            client_lock: Mutex::new(None),
        })
    }

    pub(crate) fn connect(
        name: &str,
        config: &TransportConfig,
        timeout: Duration,
    ) -> IpcResult<Self> {
        let stem = fifo_stem(name, config)?;
        let paths = FifoPaths::new(&stem);
        let deadline = Instant::now() + timeout;
        let poll = config.poll_interval();
        let timed_out = || IpcError::connect_timeout(stem.to_string_lossy(), millis(timeout));

        let client_lock = loop {
            ensure_server(&paths, name)?;
            if let Some(lock) = claim_client_slot(&paths)? {
                break lock;
            }
            debug!("Client slot of {} is taken, retrying", stem.display());
            sleep_until_next_poll(deadline, poll).ok_or_else(timed_out)?;
        };

        // A non-blocking open for writing only succeeds once the server is
        // blocked opening the same FIFO for reading.
        let probe = loop {
            match OpenOptions::new()
                .write(true)
                .custom_flags(libc::O_NONBLOCK)
                .open(&paths.to_server)
            {
                Ok(file) => break file,
                Err(e) if matches!(e.raw_os_error(), Some(libc::ENXIO | libc::ENOENT)) => {
                    ensure_server(&paths, name)?;
                    debug!("Server of {} is not accepting yet", stem.display());
                }
                Err(e) => return Err(e.into()),
            }
            sleep_until_next_poll(deadline, poll).ok_or_else(timed_out)?;
        };

        let writer = OpenOptions::new().write(true).open(&paths.to_server)?;
        drop(probe);
        let reader = OpenOptions::new().read(true).open(&paths.to_client)?;

        info!("Connected to FIFO channel {}", stem.display());
        Ok(Self {
            paths,
            slot: LinkSlot::open(Link { reader, writer }),
            server_files: Mutex::new(None),
            client_lock: Mutex::new(Some(client_lock)),
        })
    }

    /// Hold both FIFOs open read-write so an accept blocked in `open` returns.
    fn wake_pending_accept(&self) -> Vec<File> {
        if self.server_files.lock().is_none() {
            return Vec::new();
        }
        self.paths
            .fifos()
            .into_iter()
            .filter_map(|fifo| {
                OpenOptions::new()
                    .read(true)
                    .write(true)
                    .custom_flags(libc::O_NONBLOCK)
                    .open(fifo)
                    .inspect_err(|e| {
                        debug!("Cannot open {} to wake accept: {}", fifo.display(), e);
                    })
                    .ok()
            })
            .collect()
    }

    fn accept(&self) -> IpcResult<Arc<Link>> {
        self.slot.accept_with(|| {
            debug!("Waiting for client on {}", self.paths.to_server.display());
            let reader = OpenOptions::new().read(true).open(&self.paths.to_server)?;
            let writer = OpenOptions::new().write(true).open(&self.paths.to_client)?;
            info!("Client attached to {}", self.paths.to_server.display());
            Ok(Link { reader, writer })
        })
    }
}

impl DuplexBackend for FifoEndpoint {
    fn kind(&self) -> TransportKind {
        TransportKind::FifoPair
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
        if self.slot.close_with(|| self.wake_pending_accept()) {
            debug!("Closing FIFO endpoint {}", self.paths.to_server.display());
        }
        drop(self.server_files.lock().take());
        drop(self.client_lock.lock().take());
    }

    fn is_closed(&self) -> bool {
        self.slot.is_closed()
    }
}

impl Drop for FifoEndpoint {
    fn drop(&mut self) {
        self.close();
    }
}

fn is_contended(err: &io::Error) -> bool {
    err.raw_os_error() == fs2::lock_contended_error().raw_os_error()
}

/// Fail with `NotFound` unless a live server holds the server lock.
fn ensure_server(paths: &FifoPaths, name: &str) -> IpcResult<()> {
    let lock = match File::open(&paths.server_lock) {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Err(IpcError::not_found(name)),
        Err(e) => return Err(e.into()),
    };
    match FileExt::try_lock_shared(&lock) {
        Ok(()) => {
            FileExt::unlock(&lock)?;
            Err(IpcError::not_found(name))
        }
        Err(e) if is_contended(&e) => Ok(()),
        Err(e) => Err(e.into()),
    }
}

/// Take the client slot, or `None` if another client holds it.
fn claim_client_slot(paths: &FifoPaths) -> IpcResult<Option<File>> {
    let lock = OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(false)
        .mode(0o600)
        .open(&paths.client_lock)?;
    match FileExt::try_lock_exclusive(&lock) {
        Ok(()) => Ok(Some(lock)),
        Err(e) if is_contended(&e) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Sleep one poll interval, or return `None` once the deadline has passed.
fn sleep_until_next_poll(deadline: Instant, poll: Duration) -> Option<()> {
    let remaining = deadline.checked_duration_since(Instant::now())?;
    if remaining.is_zero() {
        return None;
    }
    thread::sleep(poll.min(remaining));
    Some(())
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
