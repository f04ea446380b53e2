//! License string handling and policy matching.
//!
//! - [`extract`]: flattens raw license fields (SPDX-style expressions, quoted
//!   values, `N/A`) into candidate identifier tokens.
//! - [`policy`]: the validated policy snapshot and its statuses.
//! - [`classifier`]: substring-based violation classification against the policy.

pub mod classifier;
pub mod extract;
pub mod policy;
