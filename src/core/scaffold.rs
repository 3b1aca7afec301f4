//! Package template generation
//!
//! Creates the directory skeleton and starter files for a new package:
//! manifest, CMake build script, a header/source pair, and an optional
//! GTest placeholder.

use std::path::{Path, PathBuf};

use regex::Regex;

use crate::config::defaults;
use crate::error::ScaffoldError;

/// Options for package scaffolding
#[derive(Debug, Clone)]
pub struct ScaffoldOptions {
    /// Dependency names wired into the manifest and CMake script
    pub dependencies: Vec<String>,
    /// Whether to generate the tests/ skeleton
    pub with_tests: bool,
}

impl Default for ScaffoldOptions {
    fn default() -> Self {
        Self {
            dependencies: Vec::new(),
            with_tests: true,
        }
    }
}

/// Result of scaffolding
#[derive(Debug)]
pub struct ScaffoldResult {
    /// Directory the package was created in
    pub package_dir: PathBuf,
    /// Declared dependencies with no matching package directory
    pub unknown_dependencies: Vec<String>,
}

/// Create a new package skeleton under `<root>/packages/<name>`
pub fn scaffold_package(
    root: &Path,
    name: &str,
    options: &ScaffoldOptions,
) -> Result<ScaffoldResult, ScaffoldError> {
    let pattern =
        Regex::new(defaults::PACKAGE_NAME_PATTERN).expect("Invalid package name pattern");
    if !pattern.is_match(name) {
        return Err(ScaffoldError::InvalidName {
            name: name.to_string(),
        });
    }

    let packages_dir = root.join(defaults::PACKAGES_DIR);
    let package_dir = packages_dir.join(name);
    if package_dir.exists() {
        return Err(ScaffoldError::AlreadyExists { path: package_dir });
    }

    let unknown_dependencies: Vec<String> = options
        .dependencies
        .iter()
        .filter(|dep| !packages_dir.join(dep).exists())
        .cloned()
        .collect();

    create_dir(&package_dir.join("include").join(name))?;
    create_dir(&package_dir.join("src"))?;
    if options.with_tests {
        create_dir(&package_dir.join("tests"))?;
    }

    write_file(
        &package_dir.join(defaults::MANIFEST_FILENAME),
        &manifest_content(name, &options.dependencies),
    )?;
    write_file(
        &package_dir.join("CMakeLists.txt"),
        &cmake_lists_content(name, &options.dependencies, options.with_tests),
    )?;
    write_file(
        &package_dir
            .join("include")
            .join(name)
            .join(format!("{name}.hpp")),
        &header_content(name),
    )?;
    write_file(
        &package_dir.join("src").join(format!("{name}.cpp")),
        &source_content(name),
    )?;
    if options.with_tests {
        write_file(
            &package_dir.join("tests").join(format!("{name}_test.cpp")),
            &test_content(name),
        )?;
    }

    Ok(ScaffoldResult {
        package_dir,
        unknown_dependencies,
    })
}

fn create_dir(path: &Path) -> Result<(), ScaffoldError> {
    std::fs::create_dir_all(path).map_err(|e| ScaffoldError::Io {
        path: path.to_path_buf(),
        error: e.to_string(),
    })
}

fn write_file(path: &Path, content: &str) -> Result<(), ScaffoldError> {
    std::fs::write(path, content).map_err(|e| ScaffoldError::Io {
        path: path.to_path_buf(),
        error: e.to_string(),
    })
}

fn manifest_content(name: &str, dependencies: &[String]) -> String {
    let mut lines = vec![
        "[package]".to_string(),
        format!("name = \"{name}\""),
        "version = \"0.1.0\"".to_string(),
        String::new(),
    ];

    if !dependencies.is_empty() {
        lines.push("[dependencies]".to_string());
        for dep in dependencies {
            lines.push(format!("{dep} = \"*\""));
        }
        lines.push(String::new());
    }

    lines.push("[build]".to_string());
    lines.push("type = \"cmake\"".to_string());

    lines.join("\n") + "\n"
}

fn cmake_lists_content(name: &str, dependencies: &[String], with_tests: bool) -> String {
    let mut lines = vec![
        "cmake_minimum_required(VERSION 3.16)".to_string(),
        format!("project({name} LANGUAGES CXX)"),
        String::new(),
        "set(CMAKE_CXX_STANDARD 17)".to_string(),
        "set(CMAKE_CXX_STANDARD_REQUIRED ON)".to_string(),
        "set(CMAKE_EXPORT_COMPILE_COMMANDS ON)".to_string(),
        String::new(),
    ];

    for dep in dependencies {
        lines.push(format!("find_package({dep} REQUIRED)"));
    }
    if !dependencies.is_empty() {
        lines.push(String::new());
    }

    lines.extend([
        format!("add_library({name}"),
        format!("    src/{name}.cpp"),
        ")".to_string(),
        String::new(),
        format!("target_include_directories({name}"),
        "    PUBLIC".to_string(),
        "        $<BUILD_INTERFACE:${CMAKE_CURRENT_SOURCE_DIR}/include>".to_string(),
        "        $<INSTALL_INTERFACE:include>".to_string(),
        ")".to_string(),
        String::new(),
    ]);

    if !dependencies.is_empty() {
        lines.push(format!("target_link_libraries({name}"));
        lines.push("    PUBLIC".to_string());
        for dep in dependencies {
            lines.push(format!("        {dep}::{dep}"));
        }
        lines.push(")".to_string());
        lines.push(String::new());
    }

    lines.extend([
        "# Install".to_string(),
        format!("install(TARGETS {name}"),
        format!("    EXPORT {name}Targets"),
        "    LIBRARY DESTINATION lib".to_string(),
        "    ARCHIVE DESTINATION lib".to_string(),
        ")".to_string(),
        String::new(),
        format!("install(DIRECTORY include/{name}"),
        "    DESTINATION include".to_string(),
        ")".to_string(),
        String::new(),
        format!("install(EXPORT {name}Targets"),
        format!("    FILE {name}Targets.cmake"),
        format!("    NAMESPACE {name}::"),
        format!("    DESTINATION lib/cmake/{name}"),
        ")".to_string(),
        String::new(),
        "include(CMakePackageConfigHelpers)".to_string(),
        String::new(),
    ]);

    // The generated Config.cmake pulls in dependencies before the targets
    // file; escapes survive into the emitted CMake string.
    let mut config_content = String::new();
    if !dependencies.is_empty() {
        config_content.push_str("include(CMakeFindDependencyMacro)\\n");
        for dep in dependencies {
            config_content.push_str(&format!("find_dependency({dep})\\n"));
        }
    }
    config_content.push_str(&format!(
        "include(\\${{CMAKE_CURRENT_LIST_DIR}}/{name}Targets.cmake)"
    ));

    lines.extend([
        format!("file(WRITE ${{CMAKE_CURRENT_BINARY_DIR}}/{name}Config.cmake"),
        format!("\"{config_content}"),
        "\")".to_string(),
        String::new(),
        "install(FILES".to_string(),
        format!("    ${{CMAKE_CURRENT_BINARY_DIR}}/{name}Config.cmake"),
        format!("    DESTINATION lib/cmake/{name}"),
        ")".to_string(),
    ]);

    if with_tests {
        lines.extend([
            String::new(),
            "# Tests".to_string(),
            "option(BUILD_TESTING \"Build tests\" ON)".to_string(),
            "if(BUILD_TESTING)".to_string(),
            "    enable_testing()".to_string(),
            "    find_package(GTest REQUIRED)".to_string(),
            String::new(),
            format!("    add_executable({name}_test tests/{name}_test.cpp)"),
            format!("    target_link_libraries({name}_test {name} GTest::gtest_main)"),
            format!("    add_test(NAME {name}_test COMMAND {name}_test)"),
            "endif()".to_string(),
        ]);
    }

    lines.push(String::new());
    lines.join("\n")
}

fn namespace_of(name: &str) -> String {
    name.replace('_', "::")
}

fn header_content(name: &str) -> String {
    let ns = namespace_of(name);
    format!(
        "#pragma once\n\nnamespace {ns} {{\n\n// TODO: Add declarations\n\n}}  // namespace {ns}\n"
    )
}

fn source_content(name: &str) -> String {
    let ns = namespace_of(name);
    format!(
        "#include \"{name}/{name}.hpp\"\n\nnamespace {ns} {{\n\n// TODO: Add implementations\n\n}}  // namespace {ns}\n"
    )
}

fn test_content(name: &str) -> String {
    let case = camel_case(name);
    format!(
        "#include <gtest/gtest.h>\n#include \"{name}/{name}.hpp\"\n\nTEST({case}Test, Placeholder) {{\n    EXPECT_TRUE(true);\n}}\n"
    )
}

fn camel_case(name: &str) -> String {
    name.split('_')
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
                None => String::new(),
            }
        })
        .collect()
}
