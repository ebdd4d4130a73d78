//! Transport configuration

use std::path::PathBuf;
use std::time::Duration;

use ipcwire_errors::{IpcError, IpcResult};
use serde::{Deserialize, Serialize};

use crate::{DEFAULT_CONNECT_TIMEOUT_MS, DEFAULT_NAMESPACE, MAX_MESSAGE_SIZE};

/// Native primitive carrying a duplex pipe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransportKind {
    /// Two FIFOs, one per direction (Unix)
    FifoPair,
    /// One full-duplex named pipe instance (Windows)
    NamedPipe,
}

impl TransportKind {
    /// The primitive used on the current platform
    pub fn platform_default() -> Self {
        if cfg!(windows) {
            TransportKind::NamedPipe
        } else {
            TransportKind::FifoPair
        }
    }

    /// Get a human-readable description of the transport
    pub fn description(&self) -> &'static str {
        match self {
            TransportKind::FifoPair => "FIFO pair (one FIFO per direction)",
            TransportKind::NamedPipe => "Named pipe (full duplex)",
        }
    }
}

impl Default for TransportKind {
    fn default() -> Self {
        Self::platform_default()
    }
}

/// Transport configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransportConfig {
    /// Prefix placed in front of every resolved name
    pub namespace: String,
    /// Directory holding FIFO and lock files (Unix only, defaults to the temp dir)
    pub runtime_dir: Option<PathBuf>,
    /// Bounded wait for `connect`, in milliseconds
    pub connect_timeout_ms: u64,
    /// Delay between connect attempts, in milliseconds
    pub poll_interval_ms: u64,
    /// Largest frame payload accepted on send or receive
    pub max_message_size: usize,
    /// In/out buffer size requested for named pipes (Windows only)
    pub pipe_buffer_size: u32,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            namespace: DEFAULT_NAMESPACE.to_string(),
            runtime_dir: None,
            connect_timeout_ms: DEFAULT_CONNECT_TIMEOUT_MS,
            poll_interval_ms: 10,
            max_message_size: MAX_MESSAGE_SIZE,
            pipe_buffer_size: 64 * 1024,
        }
    }
}

impl TransportConfig {
    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`IpcError::InvalidConfig`] naming the first rejected field.
    pub fn validate(&self) -> IpcResult<()> {
        if self.namespace.is_empty() {
            return Err(IpcError::invalid_config("namespace must not be empty"));
        }
        if !self
            .namespace
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
        {
            return Err(IpcError::invalid_config(format!(
                "namespace {:?} may only contain ASCII alphanumerics, '-', '_' or '.'",
                self.namespace
            )));
        }
        if self.connect_timeout_ms == 0 {
            return Err(IpcError::invalid_config(
                "connect_timeout_ms must be greater than 0",
            ));
        }
        if self.poll_interval_ms == 0 {
            return Err(IpcError::invalid_config(
                "poll_interval_ms must be greater than 0",
            ));
        }
        if self.max_message_size == 0 || self.max_message_size > u32::MAX as usize {
            return Err(IpcError::invalid_config(format!(
                "max_message_size must be between 1 and {}",
                u32::MAX
            )));
        }
        if self.pipe_buffer_size == 0 {
            return Err(IpcError::invalid_config(
                "pipe_buffer_size must be greater than 0",
            ));
        }
        Ok(())
    }

    /// Create a configuration builder.
    #[must_use]
    pub fn builder() -> TransportBuilder {
        TransportBuilder::default()
    }

    /// Connect timeout as a duration
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    /// Poll interval as a duration
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Directory holding FIFO and lock files
    pub fn runtime_dir(&self) -> PathBuf {
        self.runtime_dir.clone().unwrap_or_else(std::env::temp_dir)
    }
}

/// Builder for [`TransportConfig`]
#[derive(Debug, Default)]
pub struct TransportBuilder {
    config: TransportConfig,
}

impl TransportBuilder {
    /// Set the name prefix
    #[must_use]
    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.config.namespace = namespace.into();
        self
    }

    /// Set the FIFO and lock file directory
    #[must_use]
    pub fn runtime_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.runtime_dir = Some(dir.into());
        self
    }

    /// Set the connect timeout
    #[must_use]
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.config.connect_timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Set the connect poll interval
    #[must_use]
    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.config.poll_interval_ms = u64::try_from(interval.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Set the frame size limit
    #[must_use]
    pub fn max_message_size(mut self, max: usize) -> Self {
        self.config.max_message_size = max;
        self
    }

    /// Set the named pipe buffer size
    #[must_use]
    pub fn pipe_buffer_size(mut self, size: u32) -> Self {
        self.config.pipe_buffer_size = size;
        self
    }

    /// Build the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn build(self) -> IpcResult<TransportConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_kind_default() {
        let kind = TransportKind::default();
        #[cfg(unix)]
        assert_eq!(kind, TransportKind::FifoPair);
        #[cfg(windows)]
        assert_eq!(kind, TransportKind::NamedPipe);
        assert!(!kind.description().is_empty());
    }

    #[test]
    fn test_transport_config_default() -> IpcResult<()> {
        let config = TransportConfig::default();
        config.validate()?;
        assert_eq!(config.connect_timeout_ms, 5000);
        assert_eq!(config.max_message_size, 16 * 1024 * 1024);
        Ok(())
    }

    #[test]
    fn test_transport_builder() -> IpcResult<()> {
        let config = TransportConfig::builder()
            .namespace("app")
            .connect_timeout(Duration::from_millis(250))
            .max_message_size(1024)
            .build()?;

        assert_eq!(config.namespace, "app");
        assert_eq!(config.connect_timeout(), Duration::from_millis(250));
        assert_eq!(config.max_message_size, 1024);
        Ok(())
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(TransportConfig::builder().namespace("").build().is_err());
        assert!(TransportConfig::builder().namespace("a/b").build().is_err());
        assert!(
            TransportConfig::builder()
                .connect_timeout(Duration::ZERO)
                .build()
                .is_err()
        );
        assert!(TransportConfig::builder().max_message_size(0).build().is_err());
    }
}
