//! CLI configuration file

use std::fs;
use std::path::Path;

use ipcwire::TransportConfig;
use ipcwire::metrics::MetricsConfig;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::CliError;

/// Settings loaded from `--config` / `IPCWIRE_CONFIG`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    pub transport: TransportConfig,
    pub metrics: MetricsConfig,
    pub exposition_prefix: String,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            transport: TransportConfig::default(),
            metrics: MetricsConfig::default(),
            exposition_prefix: ipcwire::metrics::DEFAULT_EXPOSITION_PREFIX.to_string(),
        }
    }
}

impl CliConfig {
    /// Load from a YAML file, or use defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self, CliError> {
        let config = match path {
            Some(path) => {
                debug!("Loading configuration from {}", path.display());
                let text = fs::read_to_string(path)?;
                serde_yaml::from_str::<CliConfig>(&text)?
            }
            None => CliConfig::default(),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), CliError> {
        self.transport.validate()?;
        self.metrics
            .validate()
            .map_err(|e| CliError::InvalidConfiguration(e.to_string()))?;
        if self.exposition_prefix.contains(char::is_whitespace) {
            return Err(CliError::InvalidConfiguration(
                "exposition_prefix must not contain whitespace".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    type TestResult = Result<(), Box<dyn std::error::Error>>;

    #[test]
    fn test_missing_path_uses_defaults() -> TestResult {
        let config = CliConfig::load(None)?;
        assert_eq!(config, CliConfig::default());
        assert_eq!(config.exposition_prefix, "ipcwire");
        Ok(())
    }

    #[test]
    fn test_partial_yaml_overrides_defaults() -> TestResult {
        let mut file = tempfile::NamedTempFile::new()?;
        writeln!(
            file,
            "transport:\n  namespace: demo\n  connect_timeout_ms: 250\nexposition_prefix: demo"
        )?;

        let config = CliConfig::load(Some(file.path()))?;
        assert_eq!(config.transport.namespace, "demo");
        assert_eq!(config.transport.connect_timeout_ms, 250);
        assert_eq!(config.transport.max_message_size, ipcwire::transport::MAX_MESSAGE_SIZE);
        assert_eq!(config.exposition_prefix, "demo");
        Ok(())
    }

    #[test]
    fn test_invalid_values_rejected() -> TestResult {
        let mut file = tempfile::NamedTempFile::new()?;
        writeln!(file, "transport:\n  connect_timeout_ms: 0")?;
        assert!(matches!(
            CliConfig::load(Some(file.path())),
            Err(CliError::Ipc(_))
        ));

        let mut file = tempfile::NamedTempFile::new()?;
        writeln!(file, "metrics: [not, a, map]")?;
        assert!(matches!(
            CliConfig::load(Some(file.path())),
            Err(CliError::YamlError(_))
        ));
        Ok(())
    }
}
