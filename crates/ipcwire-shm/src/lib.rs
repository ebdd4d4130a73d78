//! Named shared-memory segments for ipcwire
//!
//! # Architecture
//!
//! - [`segment`]: [`SharedSegment`], create/open plus bounds-checked access
//! - [`naming`]: Segment name validation and OS identifier resolution
//!
//! # Ownership
//!
//! The process that calls [`SharedSegment::create`] owns the OS object and
//! removes it when its handle drops. Processes that [`SharedSegment::open`] the
//! same name share the bytes but never remove them.
//!
//! # Example
//!
//! ```no_run
//! use ipcwire_shm::SharedSegment;
//!
//! # fn main() -> ipcwire_errors::IpcResult<()> {
//! let mut owner = SharedSegment::create("s1", 1024)?;
//! owner.write(0, b"Hello, Shared Memory!")?;
//!
//! let peer = SharedSegment::open("s1")?;
//! assert!(!peer.is_owner());
//! assert_eq!(peer.read(0, 21)?, b"Hello, Shared Memory!");
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_op_in_unsafe_fn, clippy::unwrap_used)]
#![warn(missing_docs, rust_2018_idioms)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod naming;
pub mod segment;

pub use naming::{MAX_SEGMENT_NAME_LEN, segment_os_id, validate_segment_name};
pub use segment::{MESSAGE_HEADER_SIZE, SharedSegment};
