//! CMake build operations
//!
//! The build backend: each package is configured, built, and installed with
//! CMake against the shared install prefix, and tested with ctest. Every
//! step is an opaque process invocation reporting success or captured
//! diagnostic output.

use std::path::Path;
use std::process::Command;

use crate::core::registry::Package;
use crate::error::BuildError;

/// Check that the cmake binary is reachable before scheduling any work
pub fn ensure_available() -> Result<(), BuildError> {
    which::which("cmake").map_err(|_| BuildError::ToolchainNotFound {
        tool: "cmake".to_string(),
    })?;
    Ok(())
}

/// Configure a package with CMake
pub fn configure(
    package: &Package,
    build_dir: &Path,
    install_dir: &Path,
) -> Result<(), BuildError> {
    let mut cmd = Command::new("cmake");
    cmd.arg("-S")
        .arg(&package.path)
        .arg("-B")
        .arg(build_dir)
        .arg("-G")
        .arg("Ninja")
        .arg(format!("-DCMAKE_PREFIX_PATH={}", install_dir.display()))
        .arg(format!("-DCMAKE_INSTALL_PREFIX={}", install_dir.display()));

    run_step(&mut cmd, "configure", &package.name)
}

/// Build a configured package
pub fn build(build_dir: &Path, package: &str) -> Result<(), BuildError> {
    let mut cmd = Command::new("cmake");
    cmd.arg("--build").arg(build_dir);

    run_step(&mut cmd, "build", package)
}

/// Install a built package into the shared prefix
pub fn install(build_dir: &Path, package: &str) -> Result<(), BuildError> {
    let mut cmd = Command::new("cmake");
    cmd.arg("--install").arg(build_dir);

    run_step(&mut cmd, "install", package)
}

/// Run a package's tests with ctest
pub fn test(build_dir: &Path, package: &str) -> Result<(), BuildError> {
    let output = Command::new("ctest")
        .arg("--test-dir")
        .arg(build_dir)
        .arg("--output-on-failure")
        .output()
        .map_err(|e| BuildError::StepFailed {
            step: "test".to_string(),
            package: package.to_string(),
            output: e.to_string(),
        })?;

    // ctest output is surfaced as-is; failures were already printed
    if !output.stdout.is_empty() {
        print!("{}", String::from_utf8_lossy(&output.stdout));
    }
    if !output.stderr.is_empty() {
        eprint!("{}", String::from_utf8_lossy(&output.stderr));
    }

    if !output.status.success() {
        return Err(BuildError::TestsFailed {
            package: package.to_string(),
        });
    }

    Ok(())
}

/// Full build pipeline for one package: configure, build, install
pub fn build_package(
    package: &Package,
    build_dir: &Path,
    install_dir: &Path,
) -> Result<(), BuildError> {
    let package_build_dir = build_dir.join(&package.name);
    std::fs::create_dir_all(&package_build_dir).map_err(|e| BuildError::Io {
        path: package_build_dir.clone(),
        error: e.to_string(),
    })?;

    configure(package, &package_build_dir, install_dir)?;
    build(&package_build_dir, &package.name)?;
    install(&package_build_dir, &package.name)?;

    Ok(())
}

/// Run tests for an already-built package
pub fn test_package(package: &Package, build_dir: &Path) -> Result<(), BuildError> {
    let package_build_dir = build_dir.join(&package.name);

    if !package_build_dir.exists() {
        return Err(BuildError::NotBuilt {
            package: package.name.clone(),
        });
    }

    test(&package_build_dir, &package.name)
}

fn run_step(cmd: &mut Command, step: &str, package: &str) -> Result<(), BuildError> {
    tracing::debug!("Running cmake {step} for {package}");

    let output = cmd.output().map_err(|e| BuildError::StepFailed {
        step: step.to_string(),
        package: package.to_string(),
        output: e.to_string(),
    })?;

    if !output.status.success() {
        return Err(BuildError::StepFailed {
            step: step.to_string(),
            package: package.to_string(),
            output: String::from_utf8_lossy(&output.stderr).into_owned(),
        });
    }

    Ok(())
}
