//! Common test utilities and helpers
//!
//! This module provides shared utilities for integration tests.

// Not every test binary uses every helper.
#![allow(dead_code)]

use std::path::PathBuf;
use tempfile::TempDir;

/// Test workspace context
///
/// Creates a temporary directory for test workspaces and provides
/// utilities for setting up package layouts.
pub struct TestWorkspace {
    /// Temporary directory for the test workspace
    pub dir: TempDir,
}

impl TestWorkspace {
    /// Create a new test workspace in a temporary directory
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// Get the path to the test workspace directory
    pub fn path(&self) -> PathBuf {
        self.dir.path().to_path_buf()
    }

    /// Create a file in the test workspace
    pub fn create_file(&self, name: &str, content: &str) {
        let path = self.dir.path().join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directories");
        }
        std::fs::write(path, content).expect("Failed to write file");
    }

    /// Create a directory in the test workspace
    pub fn create_dir(&self, name: &str) {
        let path = self.dir.path().join(name);
        std::fs::create_dir_all(path).expect("Failed to create directory");
    }

    /// Check if a file exists in the test workspace
    pub fn file_exists(&self, name: &str) -> bool {
        self.dir.path().join(name).exists()
    }

    /// Add a package directory with a conduit.toml manifest
    pub fn add_package(&self, name: &str, dependencies: &[&str]) {
        let mut manifest = format!("[package]\nname = \"{name}\"\nversion = \"0.1.0\"\n");
        if !dependencies.is_empty() {
            manifest.push_str("\n[dependencies]\n");
            for dep in dependencies {
                manifest.push_str(&format!("{dep} = \"*\"\n"));
            }
        }
        self.create_file(&format!("packages/{name}/conduit.toml"), &manifest);
    }

    /// Run the forge binary with the given arguments in this workspace
    pub fn run_forge(&self, args: &[&str]) -> std::process::Output {
        let mut cmd = std::process::Command::new(env!("CARGO_BIN_EXE_forge"));
        cmd.current_dir(self.path());
        for arg in args {
            cmd.arg(arg);
        }
        cmd.output().expect("Failed to execute forge")
    }
}

impl Default for TestWorkspace {
    fn default() -> Self {
        Self::new()
    }
}
