//! Loading of the two ingestion feeds.
//!
//! Each feed is a JSON array of records as written by the repository and
//! dependency collectors. Records are taken as-is: nothing is deduplicated or
//! joined here.

use std::path::Path;

use anyhow::{Context, Result};

use crate::detector::fill_manifests;
use crate::models::{PackageInstance, Repository};

pub fn load_repositories(path: &Path) -> Result<Vec<Repository>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read repository feed {}", path.display()))?;
    let mut repos: Vec<Repository> = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse repository feed {}", path.display()))?;

    for repo in &mut repos {
        fill_manifests(repo);
    }

    tracing::info!("Loaded {} repositories from {}", repos.len(), path.display());
    Ok(repos)
}

pub fn load_packages(path: &Path) -> Result<Vec<PackageInstance>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read dependency feed {}", path.display()))?;
    let packages: Vec<PackageInstance> = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse dependency feed {}", path.display()))?;

    tracing::info!(
        "Loaded {} package instances from {}",
        packages.len(),
        path.display()
    );
    Ok(packages)
}
