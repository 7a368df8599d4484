//! Version ranges for navigation and migration links.
//!
//! A released version like `2.3.7` is shown to readers as the wildcard
//! range `2.3.x`, and the migration guide anchors each section on that
//! range (`_2-3-x-breaking-changes`).
//!
//! [`patch_range`] is best-effort and never fails. [`parse_patch_range`]
//! validates its input as semver first.

pub mod manifest;

use std::fmt;

use semver::Version;
use serde::Serialize;
use thiserror::Error;
use tracing::warn;

/// Errors from version operations.
#[derive(Error, Debug)]
pub enum VersionError {
    /// Failed to parse a semver string.
    #[error("invalid semver: {0}")]
    InvalidSemver(#[from] semver::Error),

    /// The package manifest could not be read.
    #[error("failed to read {path}: {source}")]
    ReadManifest {
        /// Manifest path.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The package manifest is not valid JSON.
    #[error("failed to parse {path}: {source}")]
    ParseManifest {
        /// Manifest path.
        path: String,
        /// Underlying JSON error.
        source: serde_json::Error,
    },

    /// The manifest has no string `version` field.
    #[error("{path} has no `version` field")]
    MissingVersion {
        /// Manifest path.
        path: String,
    },
}

/// Result alias for version operations.
pub type VersionResult<T> = Result<T, VersionError>;

/// A `major.minor.x` wildcard range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PatchRange {
    /// Major component.
    pub major: u64,
    /// Minor component.
    pub minor: u64,
}

impl PatchRange {
    /// Range covering every patch release of `version`.
    pub const fn of(version: &Version) -> Self {
        Self {
            major: version.major,
            minor: version.minor,
        }
    }
}

impl fmt::Display for PatchRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.x", self.major, self.minor)
    }
}

/// Parse a version string, stripping an optional `v` prefix.
pub fn parse_version(s: &str) -> VersionResult<Version> {
    let s = s.strip_prefix('v').unwrap_or(s);
    Ok(Version::parse(s)?)
}

/// Strict range: `"v2.3.7"` → `2.3.x`, malformed input is an error.
pub fn parse_patch_range(s: &str) -> VersionResult<PatchRange> {
    parse_version(s).map(|v| PatchRange::of(&v))
}

/// Best-effort range: keep the first two dot-separated segments and
/// append `x`.
///
/// No validation happens. `"1.2.3"` gives `"1.2.x"`, and so does
/// `"1.2.3-beta.1"`. Input with a single segment keeps only that segment
/// (`"5"` gives `"5.x"`).
pub fn patch_range(version: &str) -> String {
    let segments: Vec<&str> = version.split('.').take(2).collect();
    if segments.len() < 2 {
        warn!(%version, "version has fewer than two segments");
    }
    let mut range = segments.join(".");
    range.push_str(".x");
    range
}

/// Migration-guide anchor for a range: `2.3.x` → `_2-3-x-breaking-changes`.
pub fn migration_anchor(range: &str) -> String {
    format!("_{}-breaking-changes", range.replace('.', "-"))
}
