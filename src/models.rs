use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::license::policy::PolicyStatus;

/// A repository record from the repository feed, keyed by `html_url`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Repository {
    #[serde(default)]
    pub organization: String,
    #[serde(rename = "repository_name", default)]
    pub name: String,
    /// Canonical URL; the join key for package instances.
    #[serde(rename = "html_url")]
    pub url: String,
    #[serde(rename = "is_archived", default)]
    pub archived: bool,
    #[serde(default)]
    pub visibility: String,
    #[serde(default)]
    pub last_push: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub topics: Vec<String>,
    /// Language name → bytes of code.
    #[serde(default)]
    pub languages: BTreeMap<String, u64>,
    #[serde(default)]
    pub custom_properties: BTreeMap<String, Option<PropertyValue>>,
    /// Contributor logins, most contributions first.
    #[serde(default)]
    pub contributors: Vec<String>,
    #[serde(default)]
    pub manifests: BTreeMap<PackageEcosystem, ManifestRefs>,
    #[serde(default, skip_serializing)]
    pub default_branch: Option<String>,
    #[serde(default, skip_serializing)]
    pub root_files: Vec<String>,
}

/// Value of an organization-defined custom property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Single(String),
    Multi(Vec<String>),
}

impl std::fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PropertyValue::Single(v) => write!(f, "{}", v),
            PropertyValue::Multi(vs) => write!(f, "{}", vs.join(";")),
        }
    }
}

/// A package ecosystem whose manifest and lockfile are tracked per repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PackageEcosystem {
    Conan,
    Vcpkg,
    GoModules,
    Bun,
    Npm,
    Pnpm,
    Yarn,
    Composer,
    Pdm,
    Pipenv,
    Poetry,
    Pip,
    Bundler,
    SwiftPm,
}

impl std::fmt::Display for PackageEcosystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PackageEcosystem::Conan => write!(f, "C++ - Conan"),
            PackageEcosystem::Vcpkg => write!(f, "C++ - vcpkg"),
            PackageEcosystem::GoModules => write!(f, "Go - Go modules"),
            PackageEcosystem::Bun => write!(f, "JavaScript - Bun"),
            PackageEcosystem::Npm => write!(f, "JavaScript - npm"),
            PackageEcosystem::Pnpm => write!(f, "JavaScript - pnpm"),
            PackageEcosystem::Yarn => write!(f, "JavaScript - Yarn"),
            PackageEcosystem::Composer => write!(f, "PHP - Composer"),
            PackageEcosystem::Pdm => write!(f, "Python - PDM"),
            PackageEcosystem::Pipenv => write!(f, "Python - Pipenv"),
            PackageEcosystem::Poetry => write!(f, "Python - Poetry"),
            PackageEcosystem::Pip => write!(f, "Python - pip"),
            PackageEcosystem::Bundler => write!(f, "Ruby - Bundler"),
            PackageEcosystem::SwiftPm => write!(f, "Swift - Swift Package Manager"),
        }
    }
}

/// URLs of the lockfile and manifest found for one ecosystem.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ManifestRefs {
    #[serde(default)]
    pub lock: Option<String>,
    #[serde(default)]
    pub manifest: Option<String>,
}

impl ManifestRefs {
    pub fn is_empty(&self) -> bool {
        self.lock.is_none() && self.manifest.is_none()
    }
}

/// One dependency discovered in one repository. Not deduplicated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackageInstance {
    #[serde(rename = "dependency_name")]
    pub name: String,
    #[serde(rename = "dependency_version", default)]
    pub version: String,
    pub repository_url: String,
    /// Raw license field exactly as collected.
    #[serde(default)]
    pub license: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package_manager: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dependency_repo_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dependency_license_url: Option<String>,
}

/// Repository-level summary row: a repository and its count of distinct
/// violating package names.
#[derive(Debug, Clone, Serialize)]
pub struct RepositorySummary {
    #[serde(flatten)]
    pub repository: Repository,
    pub violation_count: usize,
}

/// Package-level detail row: one per (package instance, matched policy entry).
#[derive(Debug, Clone, Serialize)]
pub struct PackageViolation {
    pub package_name: String,
    pub package_version: String,
    pub repository_url: String,
    pub license: String,
    pub matched_license: String,
    pub status: PolicyStatus,
    pub repository: Repository,
}
