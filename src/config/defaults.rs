//! Default configuration values

/// Subdirectory scanned for package manifests
pub const PACKAGES_DIR: &str = "packages";

/// Per-workspace build tree
pub const BUILD_DIR: &str = "build";

/// Shared install prefix all packages install into
pub const INSTALL_DIR: &str = "install";

/// Per-package manifest filename
pub const MANIFEST_FILENAME: &str = "conduit.toml";

/// Version used when a manifest omits one
pub const DEFAULT_PACKAGE_VERSION: &str = "0.0.0";

/// Allowed package names (C identifiers)
pub const PACKAGE_NAME_PATTERN: &str = "^[a-zA-Z][a-zA-Z0-9_]*$";
