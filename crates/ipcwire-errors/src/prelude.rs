//! Convenient re-exports.

pub use crate::error::{IpcError, IpcResult};
pub use crate::kind::ErrorKind;
