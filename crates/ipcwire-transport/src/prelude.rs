//! Convenient re-exports.

pub use crate::channel::Channel;
pub use crate::codec::FrameCodec;
pub use crate::config::{TransportConfig, TransportKind};
pub use crate::pipe::NamedPipe;
pub use crate::traits::{ByteStream, Endpoint, MessageTransport, Role};
pub use ipcwire_errors::{IpcError, IpcResult};
