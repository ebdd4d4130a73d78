//! Cross-platform same-host IPC
//!
//! This crate re-exports the ipcwire building blocks and adds [`Metered`],
//! which records any transport's traffic into a shared recorder.
//!
//! # Architecture
//!
//! - [`transport`]: Named duplex pipes, framed channels and anonymous pipes
//! - [`shm`]: Named shared-memory segments
//! - [`graceful`]: Shutdown gating and in-flight draining
//! - [`metrics`]: Thread-safe counters, latency percentiles and exports
//! - [`errors`]: The shared error taxonomy
//! - [`metered`]: [`Metered`], the metrics-recording wrapper
//!
//! Wrappers compose: `Graceful<Metered<Channel>>` gates a channel whose
//! traffic is recorded, and both stay transparent to the data.
//!
//! # Example
//!
//! ```no_run
//! use ipcwire::prelude::*;
//! use std::sync::Arc;
//!
//! # fn main() -> IpcResult<()> {
//! let metrics = Arc::new(ChannelMetrics::new());
//! let channel = Metered::with_metrics(Channel::create("c1")?, Arc::clone(&metrics));
//! let channel = Graceful::new(channel);
//!
//! channel.wait_for_client()?;
//! let request: serde_json::Value = channel.recv_json()?;
//! channel.send_json(&request)?;
//!
//! channel.shutdown();
//! channel.drain();
//! println!("{}", metrics.to_exposition("ipcwire"));
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_op_in_unsafe_fn, clippy::unwrap_used)]
#![warn(missing_docs, rust_2018_idioms)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod metered;
pub mod prelude;

pub use ipcwire_errors as errors;
pub use ipcwire_graceful as graceful;
pub use ipcwire_metrics as metrics;
pub use ipcwire_shm as shm;
pub use ipcwire_transport as transport;

pub use ipcwire_errors::{ErrorKind, IpcError, IpcResult};
pub use ipcwire_graceful::{
    Graceful, GracefulChannel, GracefulPipe, ShutdownCoordinator, ShutdownState,
};
pub use ipcwire_metrics::{ChannelMetrics, MetricsSnapshot};
pub use ipcwire_shm::SharedSegment;
pub use ipcwire_transport::{
    AnonymousPipe, ByteStream, Channel, Endpoint, FrameCodec, MessageTransport, NamedPipe, Role,
    TransportConfig,
};
pub use metered::Metered;
