//! Aggregation and reporting: joins classified packages to their repositories
//! and produces the repository summary and package detail views.
//!
//! The run is a pure function of its three inputs. Classification is
//! per-record and runs on the rayon pool; grouping, counting and the final
//! deterministic sort happen afterwards on a single thread.

use std::collections::{BTreeSet, HashMap, HashSet};

use rayon::prelude::*;
use serde::Serialize;

use crate::error::AuditError;
use crate::license::classifier::violations;
use crate::license::extract::has_unbalanced_parens;
use crate::license::policy::{Policy, PolicyEntry};
use crate::models::{PackageInstance, PackageViolation, Repository, RepositorySummary};

/// Both report views plus the run diagnostics.
#[derive(Debug, Clone, Serialize)]
pub struct AuditReport {
    pub summary: Vec<RepositorySummary>,
    pub detail: Vec<PackageViolation>,
    pub diagnostics: Diagnostics,
}

/// Non-fatal observations collected during a run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Diagnostics {
    pub repositories: usize,
    pub archived_repositories: usize,
    pub package_instances: usize,
    /// Package instances whose `repository_url` matches no repository.
    pub orphaned_packages: usize,
    pub orphaned_repository_urls: BTreeSet<String>,
    pub empty_licenses: usize,
    pub unbalanced_licenses: usize,
    /// Violating instances left out because their repository is archived.
    pub archived_violations_skipped: usize,
    pub violation_rows: usize,
}

/// Index of the repository feed by canonical URL.
pub struct RepositoryIndex<'a> {
    by_url: HashMap<&'a str, &'a Repository>,
}

impl<'a> RepositoryIndex<'a> {
    /// Fails on a duplicate URL rather than picking one of the rows.
    pub fn build(repos: &'a [Repository]) -> Result<Self, AuditError> {
        let mut by_url = HashMap::with_capacity(repos.len());
        for repo in repos {
            if by_url.insert(repo.url.as_str(), repo).is_some() {
                return Err(AuditError::DuplicateRepositoryUrl(repo.url.clone()));
            }
        }
        Ok(Self { by_url })
    }

    pub fn get(&self, url: &str) -> Option<&'a Repository> {
        self.by_url.get(url).copied()
    }
}

/// Run the full audit.
pub fn run(
    repos: &[Repository],
    packages: &[PackageInstance],
    policy: &Policy,
) -> Result<AuditReport, AuditError> {
    let index = RepositoryIndex::build(repos)?;

    let mut diagnostics = Diagnostics {
        repositories: repos.len(),
        archived_repositories: repos.iter().filter(|r| r.archived).count(),
        package_instances: packages.len(),
        ..Default::default()
    };

    let classified: Vec<(&PackageInstance, Vec<&PolicyEntry>)> = packages
        .par_iter()
        .map(|pkg| (pkg, violations(policy, &pkg.license)))
        .collect();

    let mut violating_names: HashMap<&str, HashSet<&str>> = HashMap::new();
    let mut detail = Vec::new();

    for (pkg, matched) in &classified {
        if pkg.license.trim().is_empty() {
            diagnostics.empty_licenses += 1;
        }
        if has_unbalanced_parens(&pkg.license) {
            diagnostics.unbalanced_licenses += 1;
            tracing::debug!(
                "Unbalanced parentheses in license of {}@{}: {:?}",
                pkg.name,
                pkg.version,
                pkg.license
            );
        }

        let Some(repo) = index.get(&pkg.repository_url) else {
            diagnostics.orphaned_packages += 1;
            diagnostics
                .orphaned_repository_urls
                .insert(pkg.repository_url.clone());
            continue;
        };

        if matched.is_empty() {
            continue;
        }
        if repo.archived {
            diagnostics.archived_violations_skipped += 1;
            continue;
        }

        violating_names
            .entry(repo.url.as_str())
            .or_default()
            .insert(pkg.name.as_str());

        for entry in matched {
            detail.push(PackageViolation {
                package_name: pkg.name.clone(),
                package_version: pkg.version.clone(),
                repository_url: pkg.repository_url.clone(),
                license: pkg.license.clone(),
                matched_license: entry.name.clone(),
                status: entry.status,
                repository: repo.clone(),
            });
        }
    }

    // Stable sort keeps feed order between duplicate instances.
    detail.sort_by(|a, b| {
        a.repository_url
            .cmp(&b.repository_url)
            .then_with(|| a.package_name.cmp(&b.package_name))
            .then_with(|| a.matched_license.cmp(&b.matched_license))
    });

    let mut summary: Vec<RepositorySummary> = repos
        .iter()
        .filter(|r| !r.archived)
        .filter_map(|r| {
            let count = violating_names.get(r.url.as_str()).map_or(0, HashSet::len);
            (count > 0).then(|| RepositorySummary {
                repository: r.clone(),
                violation_count: count,
            })
        })
        .collect();

    summary.sort_by(|a, b| {
        b.violation_count
            .cmp(&a.violation_count)
            .then_with(|| a.repository.url.cmp(&b.repository.url))
    });

    diagnostics.violation_rows = detail.len();

    if diagnostics.orphaned_packages > 0 {
        tracing::warn!(
            "{} package instances reference {} repositories missing from the repository feed",
            diagnostics.orphaned_packages,
            diagnostics.orphaned_repository_urls.len()
        );
    }
    if diagnostics.unbalanced_licenses > 0 {
        tracing::warn!(
            "{} license strings have unbalanced parentheses; matched as-is",
            diagnostics.unbalanced_licenses
        );
    }
    tracing::info!(
        "Audit complete: {} repositories with violations, {} violation rows",
        summary.len(),
        detail.len()
    );

    Ok(AuditReport {
        summary,
        detail,
        diagnostics,
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::license::policy::{PolicyStatus, SENTINEL};

    pub(crate) fn repo(url: &str, archived: bool) -> Repository {
        serde_json::from_value(serde_json::json!({
            "html_url": url,
            "is_archived": archived,
        }))
        .unwrap()
    }

    pub(crate) fn pkg(name: &str, repo: &str, license: &str) -> PackageInstance {
        serde_json::from_value(serde_json::json!({
            "dependency_name": name,
            "dependency_version": "1.0.0",
            "repository_url": repo,
            "license": license,
        }))
        .unwrap()
    }

    fn policy() -> Policy {
        Policy::new(vec![
            PolicyEntry::new("mpich2", PolicyStatus::Stop),
            PolicyEntry::new("MIT", PolicyStatus::Go),
            PolicyEntry::new(SENTINEL, PolicyStatus::Undetected),
        ])
        .unwrap()
    }

    #[test]
    fn test_end_to_end_scenario() {
        let repos = vec![repo("r1", false)];
        let packages = vec![pkg("p1", "r1", "mpich2"), pkg("p2", "r1", "MIT")];

        let report = run(&repos, &packages, &policy()).unwrap();

        assert_eq!(report.summary.len(), 1);
        assert_eq!(report.summary[0].repository.url, "r1");
        assert_eq!(report.summary[0].violation_count, 1);

        assert_eq!(report.detail.len(), 1);
        let row = &report.detail[0];
        assert_eq!(row.package_name, "p1");
        assert_eq!(row.license, "mpich2");
        assert_eq!(row.matched_license, "mpich2");
        assert_eq!(row.status, PolicyStatus::Stop);
        assert_eq!(row.repository_url, "r1");
        assert_eq!(row.repository.url, "r1");
    }

    #[test]
    fn test_archived_repository_excluded_from_both_views() {
        let repos = vec![repo("live", false), repo("old", true)];
        let packages = vec![pkg("a", "old", "mpich2"), pkg("b", "live", "mpich2")];

        let report = run(&repos, &packages, &policy()).unwrap();

        let urls: Vec<_> = report.summary.iter().map(|s| s.repository.url.as_str()).collect();
        assert_eq!(urls, vec!["live"]);
        assert!(report.detail.iter().all(|d| d.repository_url == "live"));
        assert_eq!(report.diagnostics.archived_violations_skipped, 1);
        assert_eq!(report.diagnostics.archived_repositories, 1);
    }

    #[test]
    fn test_count_is_distinct_package_names() {
        let repos = vec![repo("r1", false)];
        let packages = vec![
            pkg("dup", "r1", "mpich2"),
            pkg("dup", "r1", "mpich2"),
            pkg("dup", "r1", "N/A"),
            pkg("other", "r1", ""),
        ];

        let report = run(&repos, &packages, &policy()).unwrap();

        assert_eq!(report.summary[0].violation_count, 2);
        // Duplicates are kept in the detail view.
        assert_eq!(report.detail.len(), 4);
        assert_eq!(report.diagnostics.empty_licenses, 1);
    }

    #[test]
    fn test_one_detail_row_per_matched_entry() {
        let repos = vec![repo("r1", false)];
        let packages = vec![pkg("p", "r1", "mpich2 OR N/A")];

        let report = run(&repos, &packages, &policy()).unwrap();

        let matched: Vec<_> = report.detail.iter().map(|d| d.matched_license.as_str()).collect();
        assert_eq!(matched, vec!["N/A", "mpich2"]);
        assert_eq!(report.summary[0].violation_count, 1);
    }

    #[test]
    fn test_orphans_are_excluded_and_counted() {
        let repos = vec![repo("r1", false)];
        let packages = vec![pkg("p", "ghost", "mpich2"), pkg("q", "ghost", "MIT")];

        let report = run(&repos, &packages, &policy()).unwrap();

        assert!(report.summary.is_empty());
        assert!(report.detail.is_empty());
        assert_eq!(report.diagnostics.orphaned_packages, 2);
        assert_eq!(
            report.diagnostics.orphaned_repository_urls.iter().collect::<Vec<_>>(),
            vec!["ghost"]
        );
    }

    #[test]
    fn test_duplicate_repository_url_is_fatal() {
        let repos = vec![repo("r1", false), repo("r1", true)];
        let err = run(&repos, &[], &policy());
        assert!(matches!(err, Err(AuditError::DuplicateRepositoryUrl(url)) if url == "r1"));
    }

    #[test]
    fn test_summary_sorted_by_count_then_url() {
        let repos = vec![repo("b", false), repo("a", false), repo("c", false)];
        let packages = vec![
            pkg("x", "b", "mpich2"),
            pkg("x", "a", "mpich2"),
            pkg("x", "c", "mpich2"),
            pkg("y", "c", "N/A"),
        ];

        let report = run(&repos, &packages, &policy()).unwrap();

        let order: Vec<_> = report
            .summary
            .iter()
            .map(|s| (s.repository.url.as_str(), s.violation_count))
            .collect();
        assert_eq!(order, vec![("c", 2), ("a", 1), ("b", 1)]);
    }

    #[test]
    fn test_detail_sorted_by_repo_package_license() {
        let repos = vec![repo("r2", false), repo("r1", false)];
        let packages = vec![
            pkg("zeta", "r1", "mpich2"),
            pkg("alpha", "r2", "N/A"),
            pkg("alpha", "r1", "mpich2 AND N/A"),
        ];

        let report = run(&repos, &packages, &policy()).unwrap();

        let rows: Vec<_> = report
            .detail
            .iter()
            .map(|d| (d.repository_url.as_str(), d.package_name.as_str(), d.matched_license.as_str()))
            .collect();
        assert_eq!(
            rows,
            vec![
                ("r1", "alpha", "N/A"),
                ("r1", "alpha", "mpich2"),
                ("r1", "zeta", "mpich2"),
                ("r2", "alpha", "N/A"),
            ]
        );
    }

    #[test]
    fn test_unbalanced_license_still_classified() {
        let repos = vec![repo("r1", false)];
        let packages = vec![pkg("p", "r1", "(mpich2 OR MIT")];

        let report = run(&repos, &packages, &policy()).unwrap();

        assert_eq!(report.detail.len(), 1);
        assert_eq!(report.diagnostics.unbalanced_licenses, 1);
    }

    #[test]
    fn test_rerun_is_identical() {
        let repos = vec![repo("r1", false), repo("r2", false)];
        let packages = vec![pkg("p", "r1", "mpich2"), pkg("q", "r2", "N/A")];
        let policy = policy();

        let first = serde_json::to_string(&run(&repos, &packages, &policy).unwrap()).unwrap();
        let second = serde_json::to_string(&run(&repos, &packages, &policy).unwrap()).unwrap();
        assert_eq!(first, second);
    }
}
