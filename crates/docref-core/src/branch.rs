//! Branch resolution.
//!
//! The branch a site build links against is picked from, in order:
//!
//! 1. the hosting platform's git-ref variable (e.g. `VERCEL_GIT_COMMIT_REF`)
//! 2. `git rev-parse --abbrev-ref HEAD`
//! 3. a configured default (`main`)
//!
//! The first non-empty answer wins. Lookups that fail simply produce no
//! answer. Both lookups are injectable so callers can resolve without
//! touching the process environment or spawning `git`.

use std::fmt;

use serde::Serialize;
use tracing::{debug, instrument, warn};

use crate::config::{BranchConfig, DEFAULT_BRANCH};
use crate::git;

/// A non-empty source-control ref name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct BranchName(String);

impl BranchName {
    /// Wrap `name`, or `None` if it is empty.
    pub fn new(name: impl Into<String>) -> Option<Self> {
        let name = name.into();
        (!name.is_empty()).then_some(Self(name))
    }

    /// The branch name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the wrapper.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for BranchName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for BranchName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Which step of the fallback chain produced the branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BranchOrigin {
    /// The hosting platform's environment variable.
    Env,
    /// The local `git` checkout.
    Git,
    /// The configured default.
    Default,
}

impl fmt::Display for BranchOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Env => write!(f, "env"),
            Self::Git => write!(f, "git"),
            Self::Default => write!(f, "default"),
        }
    }
}

/// A resolved branch and where it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedBranch {
    /// The branch name.
    pub name: BranchName,
    /// The fallback step that produced it.
    pub origin: BranchOrigin,
}

/// Environment lookup used in production.
pub type EnvLookup = fn(&str) -> Option<String>;

/// Git lookup used in production.
pub type GitLookup = fn() -> Option<String>;

fn process_env(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

/// Resolves the current branch through the env → git → default chain.
///
/// `E` looks up an environment variable by name; `G` asks source control
/// for the checked-out ref. Swap either with [`with_env`](Self::with_env)
/// or [`with_git`](Self::with_git).
///
/// ```
/// use docref_core::branch::{BranchOrigin, BranchResolver};
///
/// let resolved = BranchResolver::new("CI_REF", "main")
///     .with_env(|_: &str| None)
///     .with_git(|| Some("feature/x\n".to_string()))
///     .resolve();
/// assert_eq!(resolved.name.as_str(), "feature/x");
/// assert_eq!(resolved.origin, BranchOrigin::Git);
/// ```
#[derive(Debug, Clone)]
pub struct BranchResolver<E = EnvLookup, G = GitLookup> {
    env_var: String,
    fallback: BranchName,
    env: E,
    git: G,
}

impl BranchResolver {
    /// Resolver reading `env_var` from the process environment and asking
    /// the local `git` checkout, falling back to `default`.
    ///
    /// An empty `default` is replaced by `main`.
    pub fn new(env_var: impl Into<String>, default: impl Into<String>) -> Self {
        let fallback = BranchName::new(default).unwrap_or_else(|| {
            warn!("empty default branch configured, using `{DEFAULT_BRANCH}`");
            BranchName(DEFAULT_BRANCH.to_string())
        });
        Self {
            env_var: env_var.into(),
            fallback,
            env: process_env,
            git: git::head_ref,
        }
    }

    /// Resolver built from the `[branch]` config section.
    pub fn from_config(config: &BranchConfig) -> Self {
        Self::new(config.env_var.clone(), config.default.clone())
    }
}

impl<E, G> BranchResolver<E, G>
where
    E: Fn(&str) -> Option<String>,
    G: Fn() -> Option<String>,
{
    /// Replace the environment lookup.
    pub fn with_env<E2>(self, env: E2) -> BranchResolver<E2, G>
    where
        E2: Fn(&str) -> Option<String>,
    {
        BranchResolver {
            env_var: self.env_var,
            fallback: self.fallback,
            env,
            git: self.git,
        }
    }

    /// Replace the git lookup.
    pub fn with_git<G2>(self, git: G2) -> BranchResolver<E, G2>
    where
        G2: Fn() -> Option<String>,
    {
        BranchResolver {
            env_var: self.env_var,
            fallback: self.fallback,
            env: self.env,
            git,
        }
    }

    /// Name of the environment variable consulted first.
    pub fn env_var(&self) -> &str {
        &self.env_var
    }

    /// Run the fallback chain. Never fails.
    #[instrument(skip(self), fields(env_var = %self.env_var))]
    pub fn resolve(&self) -> ResolvedBranch {
        // Env values are taken verbatim; only git output is trimmed.
        if let Some(name) = (self.env)(&self.env_var).and_then(BranchName::new) {
            debug!(branch = %name, "branch from environment");
            return ResolvedBranch {
                name,
                origin: BranchOrigin::Env,
            };
        }

        if let Some(name) = (self.git)().and_then(|raw| BranchName::new(raw.trim())) {
            debug!(branch = %name, "branch from git");
            return ResolvedBranch {
                name,
                origin: BranchOrigin::Git,
            };
        }

        debug!(branch = %self.fallback, "branch from default");
        ResolvedBranch {
            name: self.fallback.clone(),
            origin: BranchOrigin::Default,
        }
    }
}
