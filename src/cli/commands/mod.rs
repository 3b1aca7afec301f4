//! CLI command implementations
//!
//! Each command is implemented in its own submodule.

pub mod build;
pub mod clean;
pub mod list;
pub mod pkg;

use anyhow::Result;
use clap::Subcommand;

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build packages
    Build {
        /// Package to build (default: all)
        package: Option<String>,

        /// Number of parallel jobs
        #[arg(short, long)]
        jobs: Option<usize>,
    },

    /// Run package tests
    Test {
        /// Package to test (default: all)
        package: Option<String>,

        /// Number of parallel jobs
        #[arg(short, long)]
        jobs: Option<usize>,
    },

    /// List packages
    List {
        /// Show build order
        #[arg(long)]
        order: bool,
    },

    /// Remove build artifacts
    Clean,

    /// Create a new package
    Pkg {
        /// Package name
        name: String,

        /// Comma-separated dependencies
        #[arg(long)]
        deps: Option<String>,

        /// Skip test scaffolding
        #[arg(long)]
        no_tests: bool,
    },
}

impl Commands {
    /// Execute the command
    pub async fn run(self, quiet: bool, json: bool) -> Result<()> {
        let root = std::env::current_dir()?;
        match self {
            Self::Build { package, jobs } => {
                build::execute(&root, build::BuildOptions { package, jobs, quiet }).await
            }
            Self::Test { package, jobs } => {
                test::execute(&root, test::TestOptions { package, jobs, quiet }).await
            }
            Self::List { order } => list::execute(&root, order, json).await,
            Self::Clean => clean::execute(&root, quiet).await,
            Self::Pkg {
                name,
                deps,
                no_tests,
            } => pkg::execute(&root, &name, deps.as_deref(), no_tests).await,
        }
    }
}
