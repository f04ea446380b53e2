use thiserror::Error;

use crate::license::policy::PolicyStatus;

/// Fatal errors: any of these aborts the audit before a report is produced.
#[derive(Error, Debug)]
pub enum AuditError {
    #[error("policy contains an entry with an empty license name")]
    EmptyPolicyName,

    #[error("policy is missing the mandatory \"N/A\" = \"UNDETECTED\" entry")]
    MissingSentinel,

    #[error("policy entry \"N/A\" must have status UNDETECTED, found {status}")]
    SentinelStatus { status: PolicyStatus },

    #[error("unknown policy status \"{0}\" (expected GO, CAUTION, STOP, UNCLASSIFIED or UNDETECTED)")]
    UnknownStatus(String),

    #[error("policy lists license \"{0}\" more than once")]
    DuplicatePolicyEntry(String),

    #[error("repository feed lists {0} more than once")]
    DuplicateRepositoryUrl(String),
}
