use crate::license::policy::{Policy, PolicyEntry, SENTINEL};

/// Substring-containment test used for all license matching.
///
/// Matches against the raw field, not the extracted tokens, so `MIT` is
/// present in `MIT-0` and in `MIT OR Apache-2.0` alike. Over-matching of this
/// kind is accepted; an empty name never matches.
pub fn license_contains(raw: &str, name: &str) -> bool {
    !name.is_empty() && raw.contains(name)
}

/// All policy entries present in `raw`, allowed or not, in name order.
pub fn matching_entries<'p>(policy: &'p Policy, raw: &str) -> Vec<&'p PolicyEntry> {
    let subject = effective_license(policy, raw);
    policy
        .entries()
        .iter()
        .filter(|e| license_contains(subject, &e.name))
        .collect()
}

/// The disallowed policy entries present in `raw`. A package is a violation
/// exactly when this is non-empty.
pub fn violations<'p>(policy: &'p Policy, raw: &str) -> Vec<&'p PolicyEntry> {
    let subject = effective_license(policy, raw);
    policy
        .disallowed()
        .filter(|e| license_contains(subject, &e.name))
        .collect()
}

pub fn is_violation(policy: &Policy, raw: &str) -> bool {
    let subject = effective_license(policy, raw);
    policy
        .disallowed()
        .any(|e| license_contains(subject, &e.name))
}

/// Blank fields stand for the undetected sentinel when the policy says so.
fn effective_license<'a>(policy: &Policy, raw: &'a str) -> &'a str {
    if policy.empty_as_undetected() && raw.trim().is_empty() {
        SENTINEL
    } else {
        raw
    }
}
