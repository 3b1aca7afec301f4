//! Manifest (conduit.toml) parsing
//!
//! Every package directory carries a `conduit.toml` describing the package.
//! Only three fields matter to the orchestrator: the package name, its
//! version, and the names of its dependencies. Everything else (build type,
//! option tables) is passed over.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::config::defaults;

/// A parsed per-package manifest (conduit.toml)
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PackageManifest {
    /// The `[package]` table
    #[serde(default)]
    pub package: PackageSection,

    /// The `[dependencies]` table; keys are dependency names, values are
    /// version constraints (currently informational)
    #[serde(default)]
    pub dependencies: BTreeMap<String, toml::Value>,

    /// The `[build]` table
    #[serde(default)]
    pub build: Option<BuildSection>,
}

/// The `[package]` table of a manifest
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PackageSection {
    /// Package name; validated during discovery, not here, so that a
    /// missing name can be reported with the manifest path
    #[serde(default)]
    pub name: Option<String>,

    /// Package version
    #[serde(default = "default_version")]
    pub version: String,
}

fn default_version() -> String {
    defaults::DEFAULT_PACKAGE_VERSION.to_string()
}

impl Default for PackageSection {
    fn default() -> Self {
        Self {
            name: None,
            version: default_version(),
        }
    }
}

/// The `[build]` table of a manifest
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BuildSection {
    /// Build backend type (only "cmake" is supported)
    #[serde(default = "default_build_type")]
    pub r#type: String,
}

fn default_build_type() -> String {
    "cmake".to_string()
}

impl PackageManifest {
    /// Parse a manifest from TOML text
    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Declared package name, if present and non-empty
    pub fn name(&self) -> Option<&str> {
        self.package.name.as_deref().filter(|name| !name.is_empty())
    }

    /// Declared dependency names, in lexicographic order
    pub fn dependency_names(&self) -> Vec<String> {
        self.dependencies.keys().cloned().collect()
    }
}
