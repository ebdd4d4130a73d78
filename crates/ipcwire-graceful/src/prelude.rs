//! Convenient re-exports.

pub use crate::coordinator::{OperationGuard, ShutdownCoordinator};
pub use crate::state::ShutdownState;
pub use crate::wrapper::{Graceful, GracefulChannel, GracefulPipe};
