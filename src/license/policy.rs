use std::collections::BTreeMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AuditError;

/// Name of the mandatory policy entry for undetected licenses.
pub const SENTINEL: &str = "N/A";

/// Operator classification of a license identifier.
///
/// Parsing ignores ASCII case, so `go`, `Go` and `gO` all read as `GO`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE", try_from = "String")]
pub enum PolicyStatus {
    Go,
    Caution,
    Stop,
    Unclassified,
    Undetected,
}

impl FromStr for PolicyStatus {
    type Err = AuditError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "GO" => Ok(PolicyStatus::Go),
            "CAUTION" => Ok(PolicyStatus::Caution),
            "STOP" => Ok(PolicyStatus::Stop),
            "UNCLASSIFIED" => Ok(PolicyStatus::Unclassified),
            "UNDETECTED" => Ok(PolicyStatus::Undetected),
            _ => Err(AuditError::UnknownStatus(s.to_string())),
        }
    }
}

impl TryFrom<String> for PolicyStatus {
    type Error = AuditError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl PolicyStatus {
    /// `GO` is the only allowed status.
    pub fn is_disallowed(self) -> bool {
        !matches!(self, PolicyStatus::Go)
    }
}

impl std::fmt::Display for PolicyStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PolicyStatus::Go => write!(f, "GO"),
            PolicyStatus::Caution => write!(f, "CAUTION"),
            PolicyStatus::Stop => write!(f, "STOP"),
            PolicyStatus::Unclassified => write!(f, "UNCLASSIFIED"),
            PolicyStatus::Undetected => write!(f, "UNDETECTED"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyEntry {
    pub name: String,
    pub status: PolicyStatus,
}

impl PolicyEntry {
    pub fn new(name: impl Into<String>, status: PolicyStatus) -> Self {
        Self {
            name: name.into(),
            status,
        }
    }
}

/// Validated, immutable policy table for one audit run.
///
/// Construction guarantees every entry has a non-empty name, names are unique,
/// and the `N/A` → `UNDETECTED` sentinel is present. Entries are kept sorted
/// by name so iteration order is stable.
#[derive(Debug, Clone)]
pub struct Policy {
    entries: Vec<PolicyEntry>,
    empty_as_undetected: bool,
}

impl Policy {
    pub fn new(entries: Vec<PolicyEntry>) -> Result<Self, AuditError> {
        let mut by_name: BTreeMap<String, PolicyStatus> = BTreeMap::new();

        for entry in entries {
            if entry.name.trim().is_empty() {
                return Err(AuditError::EmptyPolicyName);
            }
            if by_name.insert(entry.name.clone(), entry.status).is_some() {
                return Err(AuditError::DuplicatePolicyEntry(entry.name));
            }
        }

        match by_name.get(SENTINEL) {
            None => return Err(AuditError::MissingSentinel),
            Some(PolicyStatus::Undetected) => {}
            Some(other) => return Err(AuditError::SentinelStatus { status: *other }),
        }

        let entries = by_name
            .into_iter()
            .map(|(name, status)| PolicyEntry { name, status })
            .collect();

        Ok(Self {
            entries,
            empty_as_undetected: true,
        })
    }

    /// Build from the `[policy.licenses]` table of the config file.
    pub fn from_table(table: &BTreeMap<String, PolicyStatus>) -> Result<Self, AuditError> {
        Self::new(
            table
                .iter()
                .map(|(name, status)| PolicyEntry::new(name.clone(), *status))
                .collect(),
        )
    }

    /// Whether an empty license field is classified as the `N/A` sentinel.
    pub fn with_empty_as_undetected(mut self, enabled: bool) -> Self {
        self.empty_as_undetected = enabled;
        self
    }

    pub fn empty_as_undetected(&self) -> bool {
        self.empty_as_undetected
    }

    pub fn entries(&self) -> &[PolicyEntry] {
        &self.entries
    }

    /// Entries whose status is disallowed.
    pub fn disallowed(&self) -> impl Iterator<Item = &PolicyEntry> {
        self.entries.iter().filter(|e| e.status.is_disallowed())
    }

    /// Exact-name lookup.
    pub fn status_of(&self, name: &str) -> Option<PolicyStatus> {
        self.entries
            .binary_search_by(|e| e.name.as_str().cmp(name))
            .ok()
            .map(|i| self.entries[i].status)
    }
}
