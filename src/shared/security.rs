use crate::shared::error::DepGraphError;
use crate::shared::Result;
use std::fs;
use std::path::{Component, Path};

/// Maximum size of a repository file read during acquisition (20 MB)
pub const MAX_FILE_SIZE: u64 = 20 * 1024 * 1024;

/// Validates that a path is not a symbolic link
///
/// # Security
/// Uses `symlink_metadata()` so the link itself is checked, not its target.
///
/// # Arguments
/// * `path` - The path to validate
/// * `operation` - Description of the operation (e.g., "read", "write") for error messages
pub fn validate_not_symlink(path: &Path, operation: &str) -> Result<()> {
    let metadata = fs::symlink_metadata(path).map_err(|e| {
        anyhow::anyhow!(
            "Failed to read metadata for {} operation on {}: {}",
            operation,
            path.display(),
            e
        )
    })?;

    if metadata.is_symlink() {
        return Err(DepGraphError::SecurityError {
            path: path.to_path_buf(),
            reason: format!("{} operations on symbolic links are not allowed", operation),
            hint: "Point at the real file or directory instead of a link".to_string(),
        }
        .into());
    }

    Ok(())
}

/// Validates that a path is a regular file within the size limit
///
/// # Errors
/// Returns an error if the path is a symbolic link, is not a regular file,
/// or exceeds `max_size` bytes
pub fn validate_regular_file(path: &Path, max_size: u64) -> Result<()> {
    let metadata = fs::symlink_metadata(path)
        .map_err(|e| anyhow::anyhow!("Failed to read {} metadata: {}", path.display(), e))?;

    if metadata.is_symlink() {
        return Err(DepGraphError::SecurityError {
            path: path.to_path_buf(),
            reason: "Symbolic links are not read from repositories".to_string(),
            hint: "Commit the real file instead of a link".to_string(),
        }
        .into());
    }

    if !metadata.is_file() {
        anyhow::bail!("{} is not a regular file", path.display());
    }

    if metadata.len() > max_size {
        anyhow::bail!(
            "Security: {} is too large ({} bytes). Maximum allowed size is {} bytes.",
            path.display(),
            metadata.len(),
            max_size
        );
    }

    Ok(())
}

/// Validates a repository-relative path before it is joined onto a root
///
/// # Errors
/// Returns an error for empty, absolute, or parent-traversing paths
pub fn validate_relative_path(path: &str) -> Result<()> {
    if path.trim().is_empty() {
        anyhow::bail!("Security: empty repository path");
    }
    if path.contains('\\') {
        anyhow::bail!("Security: {} contains backslashes", path);
    }
    let escapes = Path::new(path)
        .components()
        .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
    if escapes {
        anyhow::bail!(
            "Security: {} leaves the repository root, which is not allowed",
            path
        );
    }
    Ok(())
}
