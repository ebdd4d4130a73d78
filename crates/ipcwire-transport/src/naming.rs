//! Channel name validation and platform resolution
//!
//! A short name such as `c1` resolves to
//! `<runtime_dir>/<namespace>-c1` on Unix (the stem of the FIFO and lock
//! files) and to `\\.\pipe\<namespace>-c1` on Windows. The resolved form
//! always ends with the short name.

use std::path::PathBuf;

use ipcwire_errors::{IpcError, IpcResult};

use crate::config::TransportConfig;

/// Longest accepted channel name, in bytes
pub const MAX_NAME_LEN: usize = 128;

/// Check that a channel name can be embedded in a path or pipe name.
///
/// # Errors
///
/// Returns [`IpcError::InvalidName`] if the name is empty, too long, a dot
/// path component, or contains a path separator or control character.
pub fn validate_name(name: &str) -> IpcResult<()> {
    if name.is_empty() {
        return Err(IpcError::invalid_name("channel name must not be empty"));
    }
    if name.len() > MAX_NAME_LEN {
        return Err(IpcError::invalid_name(format!(
            "channel name is {} bytes, the limit is {MAX_NAME_LEN}",
            name.len()
        )));
    }
    if name == "." || name == ".." {
        return Err(IpcError::invalid_name(format!(
            "{name:?} is not a valid channel name"
        )));
    }
    if let Some(bad) = name
        .chars()
        .find(|c| matches!(c, '/' | '\\') || c.is_control())
    {
        return Err(IpcError::invalid_name(format!(
            "channel name {name:?} contains {bad:?}"
        )));
    }
    Ok(())
}

/// Path stem shared by a channel's FIFO and lock files.
pub(crate) fn fifo_stem(name: &str, config: &TransportConfig) -> IpcResult<PathBuf> {
    validate_name(name)?;
    Ok(config
        .runtime_dir()
        .join(format!("{}-{name}", config.namespace)))
}

/// Full named pipe path.
pub(crate) fn pipe_path(name: &str, config: &TransportConfig) -> IpcResult<String> {
    validate_name(name)?;
    Ok(format!(r"\\.\pipe\{}-{name}", config.namespace))
}

/// Resolve a channel name for the current platform.
///
/// # Errors
///
/// Returns [`IpcError::InvalidName`] if the name is rejected by [`validate_name`].
pub fn resolve(name: &str, config: &TransportConfig) -> IpcResult<String> {
    if cfg!(windows) {
        pipe_path(name, config)
    } else {
        Ok(fifo_stem(name, config)?.to_string_lossy().into_owned())
    }
}
