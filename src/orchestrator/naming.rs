//! Deterministic revision and database names.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::{BuildSelector, OutputIdentifier, ResolvedRevision, VersionSelector};

static CVE_PREFIX_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^cve-").expect("Invalid CVE prefix regex"));

/// Git suffix naming the first parent of a commit.
const PARENT_SUFFIX: &str = "~1";

/// Revision to analyze for a fix commit.
///
/// No check is made that the revision exists; that surfaces at checkout.
pub fn resolve_revision(fix_revision: &str, version: VersionSelector) -> ResolvedRevision {
    match version {
        VersionSelector::BeforeFix => {
            ResolvedRevision::new(format!("{}{}", fix_revision, PARENT_SUFFIX))
        }
        VersionSelector::AfterFix => ResolvedRevision::new(fix_revision),
    }
}

/// Database name for a vulnerability id and the two selectors.
///
/// `CVE-2025-38245` → `db_2025_38245`, then `_none` for no-build mode, then
/// `_fixed` for the fix revision. Suffix order is fixed.
pub fn output_identifier(
    vuln_id: &str,
    build: BuildSelector,
    version: VersionSelector,
) -> OutputIdentifier {
    let stripped = CVE_PREFIX_REGEX.replace(vuln_id, "");
    let mut identifier = format!("db_{}", stripped.replace('-', "_"));

    if build == BuildSelector::NoBuild {
        identifier.push_str("_none");
    }
    if version == VersionSelector::AfterFix {
        identifier.push_str("_fixed");
    }

    OutputIdentifier::new(identifier)
}
