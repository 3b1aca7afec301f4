//! Clean logic
//!
//! Removes the per-workspace build/ tree and the shared install/ prefix.

use std::path::Path;

use crate::config::defaults;
use crate::error::FilesystemError;

/// Directories to remove during clean
pub const CLEAN_DIRECTORIES: &[&str] = &[defaults::BUILD_DIR, defaults::INSTALL_DIR];

/// Result of clean operation
#[derive(Debug, Default)]
pub struct CleanResult {
    /// Directories that were removed
    pub removed: Vec<String>,
    /// Directories that didn't exist (skipped)
    pub skipped: Vec<String>,
}

/// Remove build artifacts from a workspace
pub fn clean_workspace(root: &Path) -> Result<CleanResult, FilesystemError> {
    let mut result = CleanResult::default();

    for dir_name in CLEAN_DIRECTORIES {
        let dir_path = root.join(dir_name);

        if dir_path.exists() {
            std::fs::remove_dir_all(&dir_path).map_err(|e| FilesystemError::RemoveDir {
                path: dir_path.clone(),
                error: e.to_string(),
            })?;
            tracing::info!("Removed {}", dir_path.display());
            result.removed.push((*dir_name).to_string());
        } else {
            result.skipped.push((*dir_name).to_string());
        }
    }

    Ok(result)
}
