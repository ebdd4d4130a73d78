//! Duplex pipes and framed message channels for same-host IPC
//!
//! # Architecture
//!
//! - [`pipe`]: [`NamedPipe`], a named duplex byte stream between one server and one client
//! - [`channel`]: [`Channel`], length-prefixed messages with JSON helpers over a pipe
//! - [`codec`]: [`FrameCodec`], the wire framing usable over any `Read`/`Write`
//! - [`anonymous`]: [`AnonymousPipe`], unnamed one-way pipes for child processes
//! - [`traits`]: Capability seams consumed by wrappers such as graceful shutdown
//! - [`config`]: Namespace, timeouts and size limits
//! - [`naming`]: Name validation and platform resolution
//!
//! On Windows a pipe is one full-duplex named pipe instance. On Unix it is a
//! pair of FIFOs plus lock files under the runtime directory; each direction
//! has its own handle.
//!
//! # Example
//!
//! ```no_run
//! use ipcwire_transport::prelude::*;
//! use std::thread;
//!
//! # fn main() -> IpcResult<()> {
//! let server = Channel::create("c1")?;
//! let client = thread::spawn(|| -> IpcResult<String> {
//!     let channel = Channel::connect("c1")?;
//!     channel.send_json(&"ping")?;
//!     channel.recv_json()
//! });
//!
//! server.wait_for_client()?;
//! let request: String = server.recv_json()?;
//! assert_eq!(request, "ping");
//! server.send_json(&"pong")?;
//! # let _ = client.join();
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_op_in_unsafe_fn, clippy::unwrap_used)]
#![warn(missing_docs, rust_2018_idioms)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod anonymous;
pub mod channel;
pub mod codec;
pub mod config;
pub mod naming;
pub mod pipe;
pub mod prelude;
pub mod traits;

mod sys;

pub use anonymous::{AnonymousPipe, PipeReader, PipeWriter};
pub use channel::Channel;
pub use codec::{FrameCodec, FrameHeader, decode_json, encode_json};
pub use config::{TransportBuilder, TransportConfig, TransportKind};
pub use naming::{MAX_NAME_LEN, resolve, validate_name};
pub use pipe::NamedPipe;
pub use traits::{ByteStream, Endpoint, MessageTransport, Role};

/// Namespace prefixed to every resolved channel name by default
pub const DEFAULT_NAMESPACE: &str = "ipcwire";

/// Default bounded wait for `connect`, in milliseconds
pub const DEFAULT_CONNECT_TIMEOUT_MS: u64 = 5000;

/// Default largest frame payload (16 MiB)
pub const MAX_MESSAGE_SIZE: usize = 16 * 1024 * 1024;
