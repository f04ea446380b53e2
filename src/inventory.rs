//! Unique-license listing for policy authors.
//!
//! Enumerates every distinct token the extractor produces across the
//! dependency feed. This is a separate tool from violation classification,
//! which always matches against the raw license field.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::license::classifier::{is_violation, matching_entries};
use crate::license::extract::LicenseExtractor;
use crate::license::policy::{Policy, PolicyStatus};
use crate::models::PackageInstance;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LicenseUsage {
    pub license: String,
    /// Package instances whose license field contains this token.
    pub packages: usize,
    /// Status of the exact-name policy entry; `None` when unlisted.
    pub status: Option<PolicyStatus>,
    /// Policy entries found in the token by substring, as classification sees them.
    pub matched: Vec<String>,
    /// Whether a package licensed under this token alone would be a violation.
    pub flagged: bool,
}

/// Distinct tokens across `packages`, sorted by token.
pub fn unique_licenses(
    extractor: &LicenseExtractor,
    packages: &[PackageInstance],
    policy: &Policy,
) -> Vec<LicenseUsage> {
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for pkg in packages {
        for token in extractor.extract(&pkg.license) {
            *counts.entry(token).or_insert(0) += 1;
        }
    }

    counts
        .into_iter()
        .map(|(license, packages)| LicenseUsage {
            status: policy.status_of(&license),
            matched: matching_entries(policy, &license)
                .into_iter()
                .map(|e| e.name.clone())
                .collect(),
            flagged: is_violation(policy, &license),
            license,
            packages,
        })
        .collect()
}
