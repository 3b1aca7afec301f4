//! Dependency graph resolution
//!
//! Derives the three views the scheduler needs from a [`Registry`]: a
//! topological build order, level groups of mutually independent packages,
//! and the transitive closure of a single target. The graph itself is never
//! materialized; the declared dependency lists are the edges.

use std::collections::{HashMap, HashSet};

use crate::core::registry::Registry;
use crate::error::GraphError;

/// Compute a topological build order over the whole registry
///
/// Packages are visited in lexicographic name order, so the result is
/// deterministic: two calls on the same registry yield the same sequence.
/// Every dependency of a package appears before the package itself.
pub fn build_order(registry: &Registry) -> Result<Vec<String>, GraphError> {
    let mut on_path = HashSet::new();
    let mut finished = HashSet::new();
    let mut path = Vec::new();
    let mut order = Vec::new();

    for name in registry.names() {
        visit(registry, name, &mut on_path, &mut finished, &mut path, &mut order)?;
    }

    Ok(order)
}

/// Depth-first visit with explicit markers
///
/// `on_path` holds the current recursion path (cycle detection), `finished`
/// the nodes already emitted. A node is appended post-order, after all of
/// its dependencies.
fn visit(
    registry: &Registry,
    name: &str,
    on_path: &mut HashSet<String>,
    finished: &mut HashSet<String>,
    path: &mut Vec<String>,
    order: &mut Vec<String>,
) -> Result<(), GraphError> {
    if on_path.contains(name) {
        let mut cycle = path.clone();
        cycle.push(name.to_string());
        return Err(GraphError::CircularDependency { cycle });
    }

    if finished.contains(name) {
        return Ok(());
    }

    on_path.insert(name.to_string());
    path.push(name.to_string());

    // Caller guarantees `name` is present; dependencies may not be.
    if let Some(package) = registry.get(name) {
        for dependency in &package.dependencies {
            if !registry.contains(dependency) {
                return Err(GraphError::DependencyNotFound {
                    package: name.to_string(),
                    dependency: dependency.clone(),
                });
            }
            visit(registry, dependency, on_path, finished, path, order)?;
        }
    }

    path.pop();
    on_path.remove(name);
    finished.insert(name.to_string());
    order.push(name.to_string());

    Ok(())
}

/// Group an already-computed build order into dependency levels
///
/// Level 0 holds packages with no dependencies; every other package sits
/// one level above its deepest dependency. Packages sharing a level have no
/// dependency relationship and are safe to process concurrently. Relative
/// order within a level follows `order`.
///
/// Precondition: `order` is a valid topological order over `registry`
/// (call only after [`build_order`] succeeds).
pub fn compute_levels(registry: &Registry, order: &[String]) -> Vec<Vec<String>> {
    let mut level_of: HashMap<&str, usize> = HashMap::new();

    for name in order {
        let depth = registry
            .get(name)
            .map(|package| {
                package
                    .dependencies
                    .iter()
                    .filter_map(|dep| level_of.get(dep.as_str()))
                    .max()
                    .map_or(0, |deepest| deepest + 1)
            })
            .unwrap_or(0);
        level_of.insert(name.as_str(), depth);
    }

    let Some(max_level) = level_of.values().max().copied() else {
        return Vec::new();
    };

    let mut levels = vec![Vec::new(); max_level + 1];
    for name in order {
        if let Some(&depth) = level_of.get(name.as_str()) {
            levels[depth].push(name.clone());
        }
    }

    levels
}

/// Restrict a build order to a target and its transitive dependencies
///
/// The result is the subsequence of `order` covering exactly the target's
/// closure, so it remains a valid dependency-respecting order for the
/// reduced set.
pub fn filter_to_target(
    registry: &Registry,
    order: &[String],
    target: &str,
) -> Result<Vec<String>, GraphError> {
    if !registry.contains(target) {
        return Err(GraphError::PackageNotFound {
            name: target.to_string(),
        });
    }

    let mut needed = HashSet::new();
    collect(registry, target, &mut needed)?;

    Ok(order
        .iter()
        .filter(|name| needed.contains(name.as_str()))
        .cloned()
        .collect())
}

fn collect(
    registry: &Registry,
    name: &str,
    needed: &mut HashSet<String>,
) -> Result<(), GraphError> {
    if !needed.insert(name.to_string()) {
        return Ok(());
    }

    let package = registry.get(name).ok_or_else(|| GraphError::PackageNotFound {
        name: name.to_string(),
    })?;

    for dependency in &package.dependencies {
        collect(registry, dependency, needed)?;
    }

    Ok(())
}
