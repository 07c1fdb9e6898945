//! # Drupal Dockerizer Filesystem I/O Operations
//!
//! File: cli/src/common/fs/io.rs
//!
//! ## Overview
//!
//! Thin wrappers around `std::fs` that add error context, plus an atomic
//! writer used for every document this tool persists (sidecar config,
//! registry, debugger config).
//!
//! ## Architecture
//!
//! - **`ensure_dir_exists`**: creates a directory (and parents) or verifies an existing path is a directory.
//! - **`read_file_to_string`**: `fs::read_to_string` with context.
//! - **`write_string_atomic`**: writes to a temporary file in the target's directory, then renames it over the target, so readers never observe a half-written document.
//!
use crate::core::error::{DockerizerError, Result};
use anyhow::Context;
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::{debug, info};

/// Ensures that a directory exists at the specified path.
///
/// If the path does not exist it is created with all missing parents
/// (like `mkdir -p`). If it exists but is not a directory, a
/// `DockerizerError::InvalidConfig` error is returned.
pub fn ensure_dir_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)
            .with_context(|| format!("Failed to create directory {:?}", path))?;
        info!("Created directory: {:?}", path);
    } else if !path.is_dir() {
        anyhow::bail!(DockerizerError::InvalidConfig(format!(
            "Path exists but is not a directory: {:?}",
            path
        )));
    } else {
        debug!("Directory already exists: {:?}", path);
    }
    Ok(())
}

/// Reads the entire content of a file into a string.
pub fn read_file_to_string(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read file {:?}", path))
}

/// Writes `content` to `path` atomically, replacing any existing file.
///
/// The parent directory is created if needed. Content goes to a temporary
/// file next to the target which is then renamed over it.
///
/// # Arguments
///
/// * `path` - The file to create or replace
/// * `content` - The full new content
///
/// # Returns
///
/// * `Result<()>` - `Ok(())` once the file holds `content`
///
/// # Errors
///
/// Returns an `Err` if:
/// - The parent directory cannot be created
/// - The temporary file cannot be created, written or flushed
/// - The rename over `path` fails; `path` then keeps its old content
pub fn write_string_atomic(path: &Path, content: &str) -> Result<()> {
    // A bare file name has an empty parent; use the current directory.
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    ensure_dir_exists(parent)?;

    // Same directory as the target so the rename stays on one filesystem.
    let mut tmp = NamedTempFile::new_in(parent)
        .with_context(|| format!("Failed to create temporary file in {:?}", parent))?;
    tmp.write_all(content.as_bytes())
        .with_context(|| format!("Failed to write temporary file for {:?}", path))?;
    tmp.as_file()
        .sync_all()
        .with_context(|| format!("Failed to flush temporary file for {:?}", path))?;
    tmp.persist(path)
        .map_err(|e| e.error)
        .with_context(|| format!("Failed to write to file {:?}", path))?;
    debug!("Wrote file atomically: {:?}", path);
    Ok(())
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    /// `ensure_dir_exists` creates missing parents.
    #[test]
    fn test_ensure_dir_exists_creates_new() -> Result<()> {
        let base_dir = tempdir()?;
        let new_dir = base_dir.path().join("new/subdir");
        assert!(!new_dir.exists());
        ensure_dir_exists(&new_dir)?;
        assert!(new_dir.is_dir());
        Ok(())
    }

    /// `ensure_dir_exists` refuses a path that is a file.
    #[test]
    fn test_ensure_dir_exists_path_is_file() -> Result<()> {
        let base_dir = tempdir()?;
        let file_path = base_dir.path().join("a_file.txt");
        fs::write(&file_path, "hello")?;
        let result = ensure_dir_exists(&file_path);
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("Path exists but is not a directory"));
        Ok(())
    }

    /// Atomic writes replace existing content and create parents.
    #[test]
    fn test_write_atomic_replaces_content() -> Result<()> {
        let base_dir = tempdir()?;
        let file_path = base_dir.path().join("nested/doc.yml");
        write_string_atomic(&file_path, "first: 1\n")?;
        write_string_atomic(&file_path, "second: 2\n")?;
        assert_eq!(read_file_to_string(&file_path)?, "second: 2\n");

        // No temporary files are left behind next to the target.
        let leftovers = fs::read_dir(file_path.parent().unwrap())?.count();
        assert_eq!(leftovers, 1);
        Ok(())
    }

    #[test]
    fn test_read_file_not_found() -> Result<()> {
        let base_dir = tempdir()?;
        let result = read_file_to_string(&base_dir.path().join("nonexistent.txt"));
        assert!(result.is_err());
        Ok(())
    }
}
