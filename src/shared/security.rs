use crate::shared::Result;
use std::fs;
use std::path::Path;

/// Largest snapshot the service will load at startup (256 MB)
pub const MAX_SNAPSHOT_SIZE: u64 = 256 * 1024 * 1024;

/// Validates that an existing snapshot path is a plain file the service may
/// read or replace.
///
/// Uses `symlink_metadata()` so a symlink is rejected instead of followed.
///
/// # Arguments
/// * `path` - Snapshot location
/// * `operation` - "load" or "save", used in error messages
///
/// # Errors
/// Returns an error if the path is a symbolic link, is not a regular file,
/// or is larger than [`MAX_SNAPSHOT_SIZE`]
pub fn validate_snapshot_file(path: &Path, operation: &str) -> Result<()> {
    let metadata = fs::symlink_metadata(path).map_err(|e| {
        anyhow::anyhow!(
            "Failed to read metadata for snapshot {} on {}: {}",
            operation,
            path.display(),
            e
        )
    })?;

    if metadata.is_symlink() {
        anyhow::bail!(
            "Security: {} is a symbolic link. Snapshot {} refuses to follow symbolic links.",
            path.display(),
            operation
        );
    }

    if !metadata.is_file() {
        anyhow::bail!("{} is not a regular file", path.display());
    }

    if metadata.len() > MAX_SNAPSHOT_SIZE {
        anyhow::bail!(
            "Security: {} is too large ({} bytes). Maximum allowed size is {} bytes.",
            path.display(),
            metadata.len(),
            MAX_SNAPSHOT_SIZE
        );
    }

    Ok(())
}

/// Rejects values that would change the shape of an outbound URL when
/// interpolated as a path segment.
pub fn validate_url_component(component: &str, component_type: &str) -> Result<()> {
    if component.is_empty() {
        anyhow::bail!("{} must not be empty", component_type);
    }

    if component.contains('/') || component.contains('\\') {
        anyhow::bail!(
            "Security: {} contains path separators which are not allowed",
            component_type
        );
    }

    if component.contains("..") {
        anyhow::bail!(
            "Security: {} contains '..' which is not allowed",
            component_type
        );
    }

    if component.contains('#') || component.contains('?') || component.contains('@') {
        anyhow::bail!(
            "Security: {} contains URL-unsafe characters",
            component_type
        );
    }

    Ok(())
}
