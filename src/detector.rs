use std::collections::{BTreeMap, HashSet};

use crate::models::{ManifestRefs, PackageEcosystem, Repository};

/// Candidate file names per ecosystem, gated on a language being present in
/// the repository's language histogram. The first name found wins.
struct Candidates {
    language: &'static str,
    ecosystem: PackageEcosystem,
    lock: &'static [&'static str],
    manifest: &'static [&'static str],
}

const CANDIDATES: &[Candidates] = &[
    Candidates {
        language: "C++",
        ecosystem: PackageEcosystem::Conan,
        lock: &["conan.lock"],
        manifest: &["conanfile.py", "conanfile.txt"],
    },
    Candidates {
        language: "C++",
        ecosystem: PackageEcosystem::Vcpkg,
        lock: &["vcpkg-lock.json"],
        manifest: &["vcpkg.json"],
    },
    Candidates {
        language: "Go",
        ecosystem: PackageEcosystem::GoModules,
        lock: &["go.sum"],
        manifest: &["go.mod"],
    },
    Candidates {
        language: "JavaScript",
        ecosystem: PackageEcosystem::Bun,
        lock: &["bun.lock"],
        manifest: &["package.json"],
    },
    Candidates {
        language: "JavaScript",
        ecosystem: PackageEcosystem::Npm,
        lock: &["package-lock.json"],
        manifest: &["package.json"],
    },
    Candidates {
        language: "JavaScript",
        ecosystem: PackageEcosystem::Pnpm,
        lock: &["pnpm-lock.yaml"],
        manifest: &["package.json"],
    },
    Candidates {
        language: "JavaScript",
        ecosystem: PackageEcosystem::Yarn,
        lock: &["yarn.lock"],
        manifest: &["package.json"],
    },
    Candidates {
        language: "PHP",
        ecosystem: PackageEcosystem::Composer,
        lock: &["composer.lock"],
        manifest: &["composer.json"],
    },
    Candidates {
        language: "Python",
        ecosystem: PackageEcosystem::Pdm,
        lock: &["pdm.lock"],
        manifest: &["pyproject.toml"],
    },
    Candidates {
        language: "Python",
        ecosystem: PackageEcosystem::Pipenv,
        lock: &["Pipfile.lock"],
        manifest: &["Pipfile"],
    },
    Candidates {
        language: "Python",
        ecosystem: PackageEcosystem::Poetry,
        lock: &["poetry.lock"],
        manifest: &["pyproject.toml"],
    },
    Candidates {
        language: "Python",
        ecosystem: PackageEcosystem::Pip,
        lock: &["pylock.toml"],
        manifest: &["requirements.txt"],
    },
    Candidates {
        language: "Ruby",
        ecosystem: PackageEcosystem::Bundler,
        lock: &["Gemfile.lock"],
        manifest: &["Gemfile"],
    },
    Candidates {
        language: "Swift",
        ecosystem: PackageEcosystem::SwiftPm,
        lock: &["Package.resolved"],
        manifest: &["Package.swift"],
    },
];

/// Derive per-ecosystem lockfile/manifest URLs from a listing of the
/// repository's root directory.
///
/// `base_url` is the blob prefix, e.g. `https://host/org/repo/blob/main/`.
/// Ecosystems with neither file present are omitted.
pub fn detect_manifests(
    languages: &BTreeMap<String, u64>,
    root_files: &[String],
    base_url: &str,
) -> BTreeMap<PackageEcosystem, ManifestRefs> {
    let files: HashSet<&str> = root_files.iter().map(String::as_str).collect();
    let find = |candidates: &[&str]| {
        candidates
            .iter()
            .find(|name| files.contains(**name))
            .map(|name| format!("{}{}", base_url, name))
    };

    let mut found = BTreeMap::new();
    for c in CANDIDATES {
        if !languages.contains_key(c.language) {
            continue;
        }
        let refs = ManifestRefs {
            lock: find(c.lock),
            manifest: find(c.manifest),
        };
        if !refs.is_empty() {
            found.insert(c.ecosystem, refs);
        }
    }
    found
}

/// Fill `manifests` for a repository record that carries a root listing but
/// no precomputed references.
pub fn fill_manifests(repo: &mut Repository) {
    if !repo.manifests.is_empty() || repo.root_files.is_empty() {
        return;
    }
    let Some(branch) = repo.default_branch.as_deref() else {
        return;
    };
    let base_url = format!("{}/blob/{}/", repo.url.trim_end_matches('/'), branch);
    repo.manifests = detect_manifests(&repo.languages, &repo.root_files, &base_url);
}
