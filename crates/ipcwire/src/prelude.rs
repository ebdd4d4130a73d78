//! Convenient re-exports.

pub use crate::metered::Metered;
pub use ipcwire_errors::prelude::*;
pub use ipcwire_graceful::prelude::*;
pub use ipcwire_metrics::prelude::*;
pub use ipcwire_shm::SharedSegment;
pub use ipcwire_transport::prelude::*;
pub use ipcwire_transport::AnonymousPipe;
