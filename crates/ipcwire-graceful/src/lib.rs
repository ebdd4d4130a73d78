//! Graceful shutdown for ipcwire transports
//!
//! # Architecture
//!
//! - [`coordinator`]: [`ShutdownCoordinator`], the state machine plus in-flight counter
//! - [`wrapper`]: [`Graceful`], which gates any pipe or channel through a coordinator
//! - [`state`]: [`ShutdownState`]
//!
//! After [`Graceful::shutdown`] no new operation starts; operations that
//! were already running finish normally and [`Graceful::drain`] waits for
//! them. An operation already blocked in a native read keeps blocking until
//! the peer acts or the handle is closed.
//!
//! # Example
//!
//! ```no_run
//! use ipcwire_graceful::prelude::*;
//! use ipcwire_transport::{Channel, MessageTransport};
//! use std::time::Duration;
//!
//! # fn main() -> ipcwire_errors::IpcResult<()> {
//! let channel = GracefulChannel::new(Channel::create("jobs")?);
//! channel.send_json(&"work item")?;
//!
//! channel.shutdown();
//! channel.drain_timeout(Duration::from_secs(1))?;
//! assert!(channel.send(b"late").is_err());
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_op_in_unsafe_fn, clippy::unwrap_used)]
#![warn(missing_docs, rust_2018_idioms)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod coordinator;
pub mod prelude;
pub mod state;
pub mod wrapper;

pub use coordinator::{OperationGuard, ShutdownCoordinator};
pub use state::ShutdownState;
pub use wrapper::{Graceful, GracefulChannel, GracefulPipe};
