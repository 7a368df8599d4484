//! The resolved build-time environment of a documentation site.
//!
//! [`SiteEnv`] is built once at startup and handed by reference to
//! whatever needs the branch or version. Nothing is written to process
//! state; [`SiteEnv::exports`] lists the variables a child build should
//! receive.

use camino::Utf8Path;
use serde::Serialize;
use tracing::{info, instrument, warn};

use crate::branch::{BranchResolver, ResolvedBranch};
use crate::config::{Config, PackageConfig};
use crate::version::{manifest, patch_range};

/// Branch and version information for one site build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SiteEnv {
    /// The branch links should point at.
    pub branch: ResolvedBranch,
    /// The documented package's version, if known.
    pub version: Option<String>,
    /// `major.minor.x` form of [`version`](Self::version).
    pub version_range: Option<String>,
    #[serde(skip)]
    branch_export_var: String,
    #[serde(skip)]
    version_export_var: String,
}

impl SiteEnv {
    /// Resolve against the real environment and `git`.
    pub fn resolve(config: &Config, project_root: &Utf8Path) -> Self {
        Self::resolve_with(
            config,
            project_root,
            &BranchResolver::from_config(&config.branch),
        )
    }

    /// Resolve using the given branch resolver.
    #[instrument(skip(config, resolver))]
    pub fn resolve_with<E, G>(
        config: &Config,
        project_root: &Utf8Path,
        resolver: &BranchResolver<E, G>,
    ) -> Self
    where
        E: Fn(&str) -> Option<String>,
        G: Fn() -> Option<String>,
    {
        let branch = resolver.resolve();
        let version = package_version(&config.package, project_root);
        let version_range = version.as_deref().map(patch_range);

        info!(
            branch = %branch.name,
            origin = %branch.origin,
            version = ?version,
            "site environment resolved"
        );

        Self {
            branch,
            version,
            version_range,
            branch_export_var: config.branch.export_var.clone(),
            version_export_var: config.package.export_var.clone(),
        }
    }

    /// Variables to hand to the site build, branch first.
    ///
    /// The version range is only listed when a version is known.
    pub fn exports(&self) -> Vec<(&str, &str)> {
        let mut vars = vec![(self.branch_export_var.as_str(), self.branch.name.as_str())];
        if let Some(ref range) = self.version_range {
            vars.push((self.version_export_var.as_str(), range.as_str()));
        }
        vars
    }
}

/// Explicit config version, else the manifest's. Read failures are logged
/// and yield `None`.
fn package_version(config: &PackageConfig, project_root: &Utf8Path) -> Option<String> {
    if let Some(ref version) = config.version {
        return Some(version.clone());
    }
    let path = project_root.join(&config.manifest);
    match manifest::read_version(&path) {
        Ok(version) => Some(version),
        Err(err) => {
            warn!(error = %err, "package version unavailable");
            None
        }
    }
}
