//! Error taxonomy shared by the ipcwire transports
//!
//! Every fallible operation in the workspace returns [`IpcResult`]. The enum
//! variants carry enough context to report the failure, and [`IpcError::kind`]
//! gives a payload-free [`ErrorKind`] for matching and exit-code mapping.
//!
//! # Example
//!
//! ```
//! use ipcwire_errors::prelude::*;
//!
//! fn check(offset: usize, len: usize, size: usize) -> IpcResult<()> {
//!     if offset.checked_add(len).is_none_or(|end| end > size) {
//!         return Err(IpcError::out_of_bounds(offset, len, size));
//!     }
//!     Ok(())
//! }
//!
//! assert!(check(90, 20, 100).is_err());
//! ```

#![deny(unsafe_op_in_unsafe_fn, clippy::unwrap_used)]
#![warn(missing_docs, rust_2018_idioms)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod error;
pub mod kind;
pub mod prelude;

pub use error::{IpcError, IpcResult};
pub use kind::ErrorKind;
