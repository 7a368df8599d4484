//! Links built from the resolved site environment.
//!
//! Example pages embed an online editor opened on the branch being
//! previewed, and the version menu links to the migration guide section
//! for the current range.

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, instrument};

use crate::branch::BranchName;
use crate::config::LinksConfig;
use crate::git::{self, GitError};
use crate::version::migration_anchor;

/// Errors from link generation.
#[derive(Error, Debug)]
pub enum LinkError {
    /// Neither config nor the git remote names the repository.
    #[error("repository unknown: set links.owner and links.repo, or add a `{remote}` remote")]
    UnknownRepository {
        /// Remote that was consulted.
        remote: String,
    },

    /// Reading the remote failed.
    #[error(transparent)]
    Git(#[from] GitError),
}

/// Result alias for link operations.
pub type LinkResult<T> = Result<T, LinkError>;

/// Owner and name of the hosted repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepoCoords {
    /// Repository owner (user or organization).
    pub owner: String,
    /// Repository name.
    pub repo: String,
}

/// Repository coordinates from config, filling gaps from the git remote.
#[instrument(skip_all, fields(remote = %config.remote))]
pub fn repo_coords(config: &LinksConfig) -> LinkResult<RepoCoords> {
    if let (Some(owner), Some(repo)) = (&config.owner, &config.repo) {
        return Ok(RepoCoords {
            owner: owner.clone(),
            repo: repo.clone(),
        });
    }

    let url = match git::remote_url(&config.remote) {
        Ok(url) => url,
        Err(err @ (GitError::NotARepo | GitError::Exec(_))) => {
            debug!(error = %err, "remote unavailable");
            None
        }
        Err(err) => return Err(err.into()),
    };
    let parsed = url.as_deref().and_then(git::parse_owner_repo);
    debug!(?parsed, "repository from remote");

    let (remote_owner, remote_repo) = parsed.unzip();
    match (
        config.owner.clone().or(remote_owner),
        config.repo.clone().or(remote_repo),
    ) {
        (Some(owner), Some(repo)) => Ok(RepoCoords { owner, repo }),
        _ => Err(LinkError::UnknownRepository {
            remote: config.remote.clone(),
        }),
    }
}

/// Online-editor URL for an example directory on `branch`.
///
/// `{base}/{owner}/{repo}/tree/{branch}/{example_path}`
pub fn editor_url(
    base: &str,
    repo: &RepoCoords,
    branch: &BranchName,
    example_path: &str,
) -> String {
    let base = base.trim_end_matches('/');
    let mut url = format!("{base}/{}/{}/tree/{branch}", repo.owner, repo.repo);
    let path = example_path.trim_start_matches('/');
    if !path.is_empty() {
        url.push('/');
        url.push_str(path);
    }
    url
}

/// Migration-guide URL for a version range.
pub fn migration_url(guide_path: &str, range: &str) -> String {
    format!("{guide_path}#{}", migration_anchor(range))
}
