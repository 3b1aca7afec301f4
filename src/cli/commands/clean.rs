//! Clean command implementation
//!
//! Implements `forge clean` to remove the build/ and install/ directories.

use anyhow::Result;
use std::path::Path;

use crate::cli::output::status;
use crate::core::clean::clean_workspace;

/// Execute the clean command
pub async fn execute(root: &Path, quiet: bool) -> Result<()> {
    let result = clean_workspace(root)?;

    if !quiet {
        if result.removed.is_empty() {
            println!("Nothing to clean.");
        } else {
            println!("{} Cleaned build and install directories.", status::SUCCESS);
        }
    }

    Ok(())
}
