//! Package discovery
//!
//! Scans the workspace packages/ directory and builds the immutable catalog
//! every other component works from. Discovery is all-or-nothing: either
//! every manifest parses and names are unique, or the whole command aborts.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::config::defaults;
use crate::core::manifest::PackageManifest;
use crate::error::DiscoverError;

/// A buildable unit discovered from a manifest
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Package {
    /// Package name (unique within a registry)
    pub name: String,

    /// Declared version (informational)
    pub version: String,

    /// Package directory, handed through to the build backend
    pub path: PathBuf,

    /// Declared dependency names; may reference names absent from the
    /// registry (the graph resolver reports those)
    pub dependencies: Vec<String>,
}

/// The complete, immutable catalog of packages for one run
///
/// Backed by a `BTreeMap` so every traversal is in lexicographic name
/// order; build order and level grouping stay reproducible across runs.
#[derive(Debug, Default)]
pub struct Registry {
    packages: BTreeMap<String, Package>,
}

impl Registry {
    /// Build a registry from already-parsed packages, rejecting duplicates
    pub fn from_packages(
        packages: impl IntoIterator<Item = Package>,
    ) -> Result<Self, DiscoverError> {
        let mut map = BTreeMap::new();
        for package in packages {
            let name = package.name.clone();
            if map.insert(name.clone(), package).is_some() {
                return Err(DiscoverError::DuplicateName { name });
            }
        }
        Ok(Self { packages: map })
    }

    /// Scan `<root>/packages/` for package manifests
    ///
    /// A child directory contributes a package only if it carries a
    /// `conduit.toml`; anything else is skipped.
    pub fn discover(root: &Path) -> Result<Self, DiscoverError> {
        let packages_dir = root.join(defaults::PACKAGES_DIR);

        if !packages_dir.exists() {
            return Err(DiscoverError::PackagesDirNotFound { path: packages_dir });
        }

        let entries = std::fs::read_dir(&packages_dir).map_err(|e| DiscoverError::Io {
            path: packages_dir.clone(),
            error: e.to_string(),
        })?;

        let mut packages = Vec::new();

        for entry in entries {
            let entry = entry.map_err(|e| DiscoverError::Io {
                path: packages_dir.clone(),
                error: e.to_string(),
            })?;
            let package_dir = entry.path();

            if !package_dir.is_dir() {
                continue;
            }

            let manifest_path = package_dir.join(defaults::MANIFEST_FILENAME);
            if !manifest_path.exists() {
                continue;
            }

            let content =
                std::fs::read_to_string(&manifest_path).map_err(|e| DiscoverError::Io {
                    path: manifest_path.clone(),
                    error: e.to_string(),
                })?;

            let manifest =
                PackageManifest::from_toml(&content).map_err(|source| DiscoverError::Parse {
                    path: manifest_path.clone(),
                    source,
                })?;

            let Some(name) = manifest.name() else {
                return Err(DiscoverError::MissingName {
                    path: manifest_path,
                });
            };

            tracing::debug!("Discovered package '{name}' at {}", package_dir.display());

            packages.push(Package {
                name: name.to_string(),
                version: manifest.package.version.clone(),
                path: package_dir,
                dependencies: manifest.dependency_names(),
            });
        }

        if packages.is_empty() {
            return Err(DiscoverError::NoPackages { path: packages_dir });
        }

        Self::from_packages(packages)
    }

    /// Look up a package by name
    pub fn get(&self, name: &str) -> Option<&Package> {
        self.packages.get(name)
    }

    /// Whether a package with this name exists
    pub fn contains(&self, name: &str) -> bool {
        self.packages.contains_key(name)
    }

    /// All package names, in lexicographic order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.packages.keys().map(String::as_str)
    }

    /// All packages, in lexicographic name order
    pub fn iter(&self) -> impl Iterator<Item = &Package> {
        self.packages.values()
    }

    /// Number of packages in the registry
    pub fn len(&self) -> usize {
        self.packages.len()
    }

    /// Whether the registry is empty
    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }
}
