//! Segment name resolution.

use ipcwire_errors::{IpcError, IpcResult};

/// Prefix applied to every segment's OS identifier.
pub const SEGMENT_PREFIX: &str = "ipcwire_";

/// Longest accepted segment name. Some platforms cap the full OS identifier at 31 bytes.
pub const MAX_SEGMENT_NAME_LEN: usize = 64;

/// Check that a segment name is non-empty, short and made only of
/// ASCII alphanumerics, `-`, `_` or `.`.
///
/// # Errors
///
/// Returns [`IpcError::InvalidName`] describing the first problem found.
pub fn validate_segment_name(name: &str) -> IpcResult<()> {
    if name.is_empty() {
        return Err(IpcError::invalid_name("segment name must not be empty"));
    }
    if name.len() > MAX_SEGMENT_NAME_LEN {
        return Err(IpcError::invalid_name(format!(
            "segment name is {} bytes, the limit is {MAX_SEGMENT_NAME_LEN}",
            name.len()
        )));
    }
    if let Some(bad) = name
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.')))
    {
        return Err(IpcError::invalid_name(format!(
            "segment name {name:?} contains {bad:?}"
        )));
    }
    Ok(())
}

/// Resolve a segment name to the identifier handed to the OS.
///
/// POSIX shared memory objects live in a flat namespace rooted at `/`.
///
/// # Errors
///
/// Returns [`IpcError::InvalidName`] if the name is rejected by [`validate_segment_name`].
pub fn segment_os_id(name: &str) -> IpcResult<String> {
    validate_segment_name(name)?;
    if cfg!(unix) {
        Ok(format!("/{SEGMENT_PREFIX}{name}"))
    } else {
        Ok(format!("{SEGMENT_PREFIX}{name}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_os_id_contains_name() -> IpcResult<()> {
        let id = segment_os_id("s1")?;
        assert!(id.ends_with("ipcwire_s1"));
        #[cfg(unix)]
        assert!(id.starts_with('/'));
        Ok(())
    }

    #[test]
    fn test_rejects_bad_names() {
        assert!(segment_os_id("").is_err());
        assert!(segment_os_id("a/b").is_err());
        assert!(segment_os_id("with space").is_err());
        assert!(segment_os_id(&"x".repeat(MAX_SEGMENT_NAME_LEN + 1)).is_err());
    }
}
