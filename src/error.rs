//! Error types for conduit-forge
//!
//! Domain-specific error types using thiserror.

use std::path::PathBuf;
use thiserror::Error;

/// Package discovery errors
///
/// All of these are fatal to the current command: a registry is either
/// complete or not constructed at all.
#[derive(Error, Debug)]
pub enum DiscoverError {
    /// The packages/ scan root does not exist
    #[error("Packages directory not found: {path}")]
    PackagesDirNotFound { path: PathBuf },

    /// The scan yielded zero packages
    #[error("No packages found in {path}")]
    NoPackages { path: PathBuf },

    /// A manifest lacks a package name
    #[error("Package name missing in {path}")]
    MissingName { path: PathBuf },

    /// Two manifests declare the same name
    #[error("Duplicate package name: {name}")]
    DuplicateName { name: String },

    /// A manifest could not be read
    #[error("Failed to read '{path}': {error}")]
    Io { path: PathBuf, error: String },

    /// A manifest could not be parsed
    #[error("Failed to parse '{path}': {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Dependency graph errors
#[derive(Error, Debug)]
pub enum GraphError {
    /// Circular dependency detected
    #[error("Circular dependency detected: {}", cycle.join(" -> "))]
    CircularDependency { cycle: Vec<String> },

    /// A declared dependency is not present in the registry
    #[error("Dependency '{dependency}' not found (required by '{package}')")]
    DependencyNotFound { package: String, dependency: String },

    /// The requested target package is not present in the registry
    #[error("Package not found: {name}")]
    PackageNotFound { name: String },
}

/// Build backend errors
#[derive(Error, Debug)]
pub enum BuildError {
    /// A CMake step exited non-zero
    #[error("CMake {step} failed for '{package}':\n{output}")]
    StepFailed {
        step: String,
        package: String,
        output: String,
    },

    /// ctest reported failures
    #[error("Tests failed for '{package}'")]
    TestsFailed { package: String },

    /// The per-package build directory is missing
    #[error("Build directory not found for '{package}'. Run 'forge build' first.")]
    NotBuilt { package: String },

    /// A required tool is not on PATH
    #[error("Toolchain not found: {tool}")]
    ToolchainNotFound { tool: String },

    /// IO error while preparing a build
    #[error("IO error for '{path}': {error}")]
    Io { path: PathBuf, error: String },
}

/// Package scaffolding errors
#[derive(Error, Debug)]
pub enum ScaffoldError {
    /// Name does not match the allowed pattern
    #[error("Invalid package name: {name} (must be alphanumeric with underscores)")]
    InvalidName { name: String },

    /// A package directory with this name already exists
    #[error("Package already exists: {path}")]
    AlreadyExists { path: PathBuf },

    /// IO error while writing the template
    #[error("IO error for '{path}': {error}")]
    Io { path: PathBuf, error: String },
}

/// Filesystem errors
#[derive(Error, Debug)]
pub enum FilesystemError {
    /// Failed to remove directory
    #[error("Failed to remove directory '{path}': {error}")]
    RemoveDir { path: PathBuf, error: String },
}
