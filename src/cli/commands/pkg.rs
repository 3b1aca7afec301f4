//! Pkg command implementation
//!
//! Implements `forge pkg` to scaffold a new package skeleton.

use anyhow::Result;
use std::path::Path;

use crate::cli::output::status;
use crate::core::scaffold::{scaffold_package, ScaffoldOptions};

/// Execute the pkg command
pub async fn execute(
    root: &Path,
    name: &str,
    deps: Option<&str>,
    no_tests: bool,
) -> Result<()> {
    let dependencies: Vec<String> = deps
        .map(|list| {
            list.split(',')
                .map(|dep| dep.trim().to_string())
                .filter(|dep| !dep.is_empty())
                .collect()
        })
        .unwrap_or_default();

    let options = ScaffoldOptions {
        dependencies,
        with_tests: !no_tests,
    };

    let result = scaffold_package(root, name, &options)?;

    for dep in &result.unknown_dependencies {
        println!("{} Warning: dependency '{dep}' not found", status::WARNING);
    }
    println!("Created package: {}", result.package_dir.display());

    Ok(())
}
