//! Unnamed one-way pipes for parent/child communication

use std::io;

use ipcwire_errors::IpcResult;
use tracing::debug;

pub use std::io::{PipeReader, PipeWriter};

/// A connected reader/writer pair
///
/// Both ends implement [`std::io::Read`] or [`std::io::Write`], so the
/// [`FrameCodec`](crate::FrameCodec) runs over them directly. Either end can
/// be handed to a child process through [`std::process::Stdio`].
#[derive(Debug)]
pub struct AnonymousPipe {
    reader: PipeReader,
    writer: PipeWriter,
}

impl AnonymousPipe {
    /// Create a connected pair.
    ///
    /// # Errors
    ///
    /// Returns the OS failure, typically descriptor exhaustion.
    pub fn new() -> IpcResult<Self> {
        let (reader, writer) = io::pipe()?;
        debug!("Created anonymous pipe");
        Ok(Self { reader, writer })
    }

    /// Read end
    pub fn reader(&self) -> &PipeReader {
        &self.reader
    }

    /// Write end
    pub fn writer(&self) -> &PipeWriter {
        &self.writer
    }

    /// Separate the two ends
    pub fn split(self) -> (PipeReader, PipeWriter) {
        (self.reader, self.writer)
    }
}
