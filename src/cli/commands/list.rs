//! List command implementation
//!
//! Implements `forge list` to display discovered packages, optionally in
//! build order or as JSON for scripting.

use anyhow::Result;
use std::path::Path;

use crate::core::graph;
use crate::core::registry::{Package, Registry};

/// Execute the list command
pub async fn execute(root: &Path, order: bool, json: bool) -> Result<()> {
    let registry = Registry::discover(root)?;

    if order {
        let order = graph::build_order(&registry)?;
        if json {
            println!("{}", serde_json::to_string_pretty(&order)?);
        } else {
            for name in order {
                println!("{name}");
            }
        }
        return Ok(());
    }

    if json {
        let packages: Vec<&Package> = registry.iter().collect();
        println!("{}", serde_json::to_string_pretty(&packages)?);
        return Ok(());
    }

    for package in registry.iter() {
        let deps = if package.dependencies.is_empty() {
            "none".to_string()
        } else {
            package.dependencies.join(", ")
        };
        println!("{}: depends on [{deps}]", package.name);
    }

    Ok(())
}
