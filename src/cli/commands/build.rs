//! Build command implementation
//!
//! Implements `forge build` to compile workspace packages in dependency
//! order, parallelizing within each dependency level.

use anyhow::{bail, Context, Result};
use indicatif::ProgressBar;
use std::fs;
use std::path::Path;

use crate::cli::output::{self, status};
use crate::config::defaults;
use crate::core::graph;
use crate::core::registry::{Package, Registry};
use crate::core::runner::run_in_levels;
use crate::infra::cmake;

/// Build options
pub struct BuildOptions {
    /// Build only the target package and its dependencies
    pub package: Option<String>,
    /// Number of parallel jobs
    pub jobs: Option<usize>,
    /// Suppress progress output
    pub quiet: bool,
}

/// Execute the build command
pub async fn execute(root: &Path, options: BuildOptions) -> Result<()> {
    let registry = Registry::discover(root)?;
    let mut order = graph::build_order(&registry)?;

    if let Some(target) = &options.package {
        order = graph::filter_to_target(&registry, &order, target)?;
    }

    cmake::ensure_available()?;

    let build_dir = root.join(defaults::BUILD_DIR);
    let install_dir = root.join(defaults::INSTALL_DIR);
    fs::create_dir_all(&build_dir).with_context(|| "Failed to create build directory")?;
    fs::create_dir_all(&install_dir).with_context(|| "Failed to create install directory")?;

    let jobs = options.jobs.unwrap_or_else(num_cpus::get).max(1);
    tracing::info!("Building {} package(s) with {} job(s)", order.len(), jobs);

    let bar = if options.quiet {
        ProgressBar::hidden()
    } else {
        output::create_build_bar(order.len() as u64)
    };

    let task_bar = bar.clone();
    let failed = run_in_levels(
        &registry,
        &order,
        move |package: Package| {
            let build_dir = build_dir.clone();
            let install_dir = install_dir.clone();
            let bar = task_bar.clone();
            async move {
                bar.set_message(package.name.clone());
                let result = cmake::build_package(&package, &build_dir, &install_dir);
                bar.inc(1);
                result
            }
        },
        jobs,
    )
    .await;
    bar.finish_and_clear();

    if !failed.is_empty() {
        for failure in &failed {
            eprintln!("{} {}", status::ERROR, failure.error);
        }
        let names: Vec<&str> = failed.iter().map(|f| f.name.as_str()).collect();
        bail!("Build failed for: {}", names.join(", "));
    }

    if !options.quiet {
        println!(
            "{} Build complete. {} package(s) built.",
            status::SUCCESS,
            order.len()
        );
    }

    Ok(())
}
