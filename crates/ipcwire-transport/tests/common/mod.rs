#![allow(dead_code, reason = "each test binary uses a subset of the helpers")]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use ipcwire_transport::TransportConfig;
use tempfile::TempDir;

static COUNTER: AtomicUsize = AtomicUsize::new(0);

/// Channel name unique to this process and call.
pub fn unique_name(label: &str) -> String {
    let n = COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("{label}-{}-{n}", std::process::id())
}

/// Isolated runtime directory plus a configuration pointing at it.
pub struct Fixture {
    pub config: TransportConfig,
    _dir: TempDir,
}

impl Fixture {
    pub fn new() -> Result<Self, Box<dyn std::error::Error>> {
        Self::with_timeout(Duration::from_secs(5))
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self, Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let config = TransportConfig::builder()
            .runtime_dir(dir.path())
            .connect_timeout(timeout)
            .poll_interval(Duration::from_millis(5))
            .build()?;
        Ok(Self { config, _dir: dir })
    }
}
