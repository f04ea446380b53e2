use colored::*;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use crate::audit::{AuditReport, Diagnostics};
use crate::inventory::LicenseUsage;
use crate::license::policy::PolicyStatus;
use crate::models::{PackageViolation, Repository, RepositorySummary};

/// Render the audit as colored terminal tables.
pub fn render(report: &AuditReport, verbose: bool, quiet: bool) {
    let d = &report.diagnostics;

    if quiet {
        println!(
            "Repositories: {}  With violations: {}  Violation rows: {}  Orphaned packages: {}",
            d.repositories,
            report.summary.len().to_string().red(),
            d.violation_rows.to_string().red(),
            d.orphaned_packages.to_string().yellow(),
        );
        return;
    }

    println!(
        "\n {} v{}\n",
        "license-audit".bold(),
        env!("CARGO_PKG_VERSION")
    );
    render_diagnostics(d, report.summary.len());

    if report.summary.is_empty() {
        println!(" {} No policy violations found.\n", "[PASS]".green().bold());
        return;
    }

    println!(" {} Repositories with violations:\n", "[REPOS]".red().bold());
    render_summary_table(&report.summary, verbose);
    println!();

    println!(" {} Violating packages:\n", "[PACKAGES]".red().bold());
    render_detail_table(&report.detail, verbose);
    println!();
}

fn render_diagnostics(d: &Diagnostics, flagged: usize) {
    println!(" ┌────────────────────────────────────────────────────┐");
    println!(" │  {:<48} │", "SUMMARY".bold());
    println!(
        " │  {:<48} │",
        format!("Repositories        : {:>6} ({} archived)", d.repositories, d.archived_repositories)
    );
    println!(" │  {:<48} │", format!("Package instances   : {:>6}", d.package_instances));
    println!(" │  {:<48} │", format!("{}  Repos flagged    : {:>6}", "✗".red(), flagged));
    println!(" │  {:<48} │", format!("{}  Violation rows   : {:>6}", "✗".red(), d.violation_rows));
    println!(
        " │  {:<48} │",
        format!("{}  Orphaned packages: {:>6}", "⚠".yellow(), d.orphaned_packages)
    );
    println!(
        " │  {:<48} │",
        format!("{}  Empty licenses   : {:>6}", "⚠".yellow(), d.empty_licenses)
    );
    println!(
        " │  {:<48} │",
        format!("{}  Unbalanced parens: {:>6}", "⚠".yellow(), d.unbalanced_licenses)
    );
    println!(" └────────────────────────────────────────────────────┘\n");
}

fn header(names: &[&str]) -> Vec<Cell> {
    names
        .iter()
        .map(|n| Cell::new(n).add_attribute(Attribute::Bold))
        .collect()
}

fn render_summary_table(rows: &[RepositorySummary], verbose: bool) {
    let mut table = Table::new();
    let mut columns = vec!["Repository", "Violations"];
    if verbose {
        columns.extend(REPOSITORY_COLUMNS);
    }
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header(&columns));

    for row in rows {
        let repo = &row.repository;
        let mut cells = vec![
            Cell::new(&repo.url),
            Cell::new(row.violation_count)
                .fg(Color::Red)
                .set_alignment(CellAlignment::Right),
        ];
        if verbose {
            cells.extend(repository_fields(repo).into_iter().map(Cell::new));
        }
        table.add_row(cells);
    }

    println!("{}", table);
}

/// Repository attributes shown under `--verbose`, after the URL.
const REPOSITORY_COLUMNS: [&str; 12] = [
    "Organization",
    "Name",
    "Archived",
    "Visibility",
    "Last push",
    "Description",
    "Topics",
    "Languages",
    "Properties",
    "Contributors",
    "Manifests",
    "Manifest files",
];

fn repository_fields(repo: &Repository) -> [String; 12] {
    [
        repo.organization.clone(),
        repo.name.clone(),
        if repo.archived { "yes" } else { "no" }.to_string(),
        repo.visibility.clone(),
        repo.last_push.clone().unwrap_or_default(),
        repo.description.clone(),
        repo.topics.join(", "),
        repo.languages
            .iter()
            .map(|(lang, bytes)| format!("{}: {}", lang, bytes))
            .collect::<Vec<_>>()
            .join("\n"),
        repo.custom_properties
            .iter()
            .map(|(k, v)| match v {
                Some(v) => format!("{}: {}", k, v),
                None => format!("{}: None", k),
            })
            .collect::<Vec<_>>()
            .join("\n"),
        repo.contributors.join(", "),
        repo.manifests
            .keys()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("\n"),
        repo.manifests
            .values()
            .flat_map(|m| m.manifest.iter().chain(m.lock.iter()))
            .cloned()
            .collect::<Vec<_>>()
            .join("\n"),
    ]
}

fn render_detail_table(rows: &[PackageViolation], verbose: bool) {
    let mut table = Table::new();
    let mut columns = vec!["Repository", "Package", "Version", "Matched", "Status"];
    if verbose {
        columns.push("License");
        columns.extend(REPOSITORY_COLUMNS);
    }
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header(&columns));

    for row in rows {
        let mut cells = vec![
            Cell::new(&row.repository_url),
            Cell::new(&row.package_name),
            Cell::new(&row.package_version),
            Cell::new(&row.matched_license),
            Cell::new(row.status.to_string())
                .fg(status_color(row.status))
                .set_alignment(CellAlignment::Center),
        ];
        if verbose {
            cells.push(Cell::new(&row.license));
            cells.extend(repository_fields(&row.repository).into_iter().map(Cell::new));
        }
        table.add_row(cells);
    }

    println!("{}", table);
}

/// Render the unique-license listing.
pub fn render_inventory(usage: &[LicenseUsage], quiet: bool) {
    let unlisted = usage.iter().filter(|u| u.status.is_none()).count();
    if quiet {
        println!("Licenses: {}  Unlisted: {}", usage.len(), unlisted.to_string().yellow());
        return;
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header(&["License", "Packages", "Policy", "Matched entries"]));

    for u in usage {
        let policy_cell = match u.status {
            Some(status) => Cell::new(status.to_string()).fg(status_color(status)),
            None => Cell::new("unlisted").fg(Color::DarkGrey),
        };
        let license_cell = if u.flagged {
            Cell::new(&u.license).fg(Color::Red)
        } else {
            Cell::new(&u.license)
        };
        table.add_row(vec![
            license_cell,
            Cell::new(u.packages).set_alignment(CellAlignment::Right),
            policy_cell.set_alignment(CellAlignment::Center),
            Cell::new(u.matched.join(", ")),
        ]);
    }

    println!("{}", table);
    println!(
        "\n {} distinct licenses, {} not in policy\n",
        usage.len(),
        unlisted.to_string().yellow()
    );
}

fn status_color(status: PolicyStatus) -> Color {
    match status {
        PolicyStatus::Go => Color::Green,
        PolicyStatus::Caution => Color::Yellow,
        PolicyStatus::Stop => Color::Red,
        PolicyStatus::Unclassified => Color::Magenta,
        PolicyStatus::Undetected => Color::DarkGrey,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbose_columns_cover_repository_attributes() {
        let repo: Repository = serde_json::from_value(serde_json::json!({
            "organization": "acme",
            "repository_name": "widgets",
            "html_url": "https://git.example/acme/widgets",
            "visibility": "internal",
            "last_push": "2025-01-02T03:04:05Z",
            "description": "Widget service",
            "topics": ["backend", "api"],
            "languages": { "Go": 1200, "Ruby": 40 },
            "custom_properties": { "team": "core", "owner": null },
            "contributors": ["alice", "bob"],
            "manifests": { "go-modules": { "manifest": "u/go.mod", "lock": "u/go.sum" } },
        }))
        .unwrap();

        let fields = repository_fields(&repo);
        let by_column: std::collections::BTreeMap<_, _> =
            REPOSITORY_COLUMNS.iter().copied().zip(fields.iter()).collect();

        assert_eq!(by_column["Organization"], "acme");
        assert_eq!(by_column["Name"], "widgets");
        assert_eq!(by_column["Archived"], "no");
        assert_eq!(by_column["Visibility"], "internal");
        assert_eq!(by_column["Last push"], "2025-01-02T03:04:05Z");
        assert_eq!(by_column["Description"], "Widget service");
        assert_eq!(by_column["Topics"], "backend, api");
        assert_eq!(by_column["Languages"], "Go: 1200\nRuby: 40");
        assert_eq!(by_column["Properties"], "owner: None\nteam: core");
        assert_eq!(by_column["Contributors"], "alice, bob");
        assert_eq!(by_column["Manifests"], "Go - Go modules");
        assert_eq!(by_column["Manifest files"], "u/go.mod\nu/go.sum");
    }
}
