//! Error types for the ipcwire CLI

use ipcwire::{ErrorKind, IpcError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Ipc(#[from] IpcError),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),
}

impl CliError {
    /// Process exit code for this error
    pub fn exit_code(&self) -> u8 {
        match self {
            CliError::Ipc(e) => kind_exit_code(e.kind()),
            CliError::InvalidConfiguration(_)
            | CliError::InvalidInput(_)
            | CliError::JsonError(_)
            | CliError::YamlError(_) => 5,
            CliError::IoError(_) => 1,
        }
    }

    /// Stable label for machine-readable output
    pub fn type_name(&self) -> &'static str {
        match self {
            CliError::Ipc(e) => e.kind().as_str(),
            CliError::InvalidConfiguration(_) => "invalid_configuration",
            CliError::InvalidInput(_) => "invalid_input",
            CliError::IoError(_) => "io",
            CliError::JsonError(_) => "json",
            CliError::YamlError(_) => "yaml",
        }
    }
}

/// Exit code for an IPC failure kind.
pub fn kind_exit_code(kind: ErrorKind) -> u8 {
    match kind {
        ErrorKind::NotFound => 2,
        ErrorKind::NameConflict => 3,
        ErrorKind::ConnectTimeout | ErrorKind::DrainTimeout => 4,
        ErrorKind::Decode
        | ErrorKind::Encode
        | ErrorKind::OutOfBounds
        | ErrorKind::MessageTooLarge
        | ErrorKind::InvalidName
        | ErrorKind::InvalidConfig
        | ErrorKind::InvalidState => 5,
        ErrorKind::ChannelShutdown | ErrorKind::Closed | ErrorKind::PeerClosed => 6,
        ErrorKind::Truncated | ErrorKind::Io => 1,
    }
}

/// Exit code for any error surfaced by a command.
pub fn exit_code(error: &anyhow::Error) -> u8 {
    if let Some(cli) = error.downcast_ref::<CliError>() {
        cli.exit_code()
    } else if let Some(ipc) = error.downcast_ref::<IpcError>() {
        kind_exit_code(ipc.kind())
    } else {
        1
    }
}

/// Stable label for any error surfaced by a command.
pub fn type_name(error: &anyhow::Error) -> &'static str {
    if let Some(cli) = error.downcast_ref::<CliError>() {
        cli.type_name()
    } else if let Some(ipc) = error.downcast_ref::<IpcError>() {
        ipc.kind().as_str()
    } else {
        "other"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes_by_kind() {
        let cases = [
            (IpcError::not_found("c1"), 2),
            (IpcError::name_conflict("c1"), 3),
            (IpcError::connect_timeout("c1", 10), 4),
            (IpcError::drain_timeout(10, 1), 4),
            (IpcError::Decode("bad".to_string()), 5),
            (IpcError::out_of_bounds(90, 20, 100), 5),
            (IpcError::ChannelShutdown, 6),
            (IpcError::Closed, 6),
        ];
        for (error, code) in cases {
            let kind = error.kind();
            assert_eq!(exit_code(&anyhow::Error::new(error)), code, "{kind}");
        }
    }

    #[test]
    fn test_wrapped_errors_keep_their_code() {
        let wrapped = anyhow::Error::new(CliError::from(IpcError::not_found("c1")));
        assert_eq!(exit_code(&wrapped), 2);
        assert_eq!(type_name(&wrapped), "not_found");

        let config = anyhow::Error::new(CliError::InvalidConfiguration("bad".to_string()));
        assert_eq!(exit_code(&config), 5);
        assert_eq!(exit_code(&anyhow::anyhow!("anything else")), 1);
    }
}
