//! Git lookups used while resolving the site environment.
//!
//! Shells out to `git` so the user's own installation and repository
//! configuration apply. Nothing here writes to the repository.

use std::process::Command;

use thiserror::Error;
use tracing::{debug, instrument};

/// Errors from git operations.
#[derive(Error, Debug)]
pub enum GitError {
    /// Failed to execute the `git` command.
    #[error("failed to run git: {0}")]
    Exec(#[from] std::io::Error),

    /// `git` returned a non-zero exit code.
    #[error("git {command} failed: {stderr}")]
    Command {
        /// The git subcommand that failed (e.g., "rev-parse").
        command: String,
        /// Captured stderr.
        stderr: String,
    },

    /// Not inside a git repository.
    #[error("not a git repository (or any parent up to mount point)")]
    NotARepo,
}

/// Result alias for git operations.
pub type GitResult<T> = Result<T, GitError>;

/// Whether a `git` binary is on `PATH`.
pub fn git_available() -> bool {
    which::which("git").is_ok()
}

/// Abbreviated name of the checked-out ref, trimmed.
///
/// Equivalent to `git rev-parse --abbrev-ref HEAD`. A detached checkout
/// yields `"HEAD"`.
#[instrument]
pub fn abbrev_head() -> GitResult<String> {
    let output = git(&["rev-parse", "--abbrev-ref", "HEAD"])?;
    let name = output.trim().to_string();
    debug!(%name, "abbreviated HEAD");
    Ok(name)
}

/// Branch lookup that never fails.
///
/// Any error (git missing, not a checkout, bad exit) is logged at debug
/// level and reported as `None`, as is empty output.
pub fn head_ref() -> Option<String> {
    if !git_available() {
        debug!("git not found on PATH");
        return None;
    }
    match abbrev_head() {
        Ok(name) if !name.is_empty() => Some(name),
        Ok(_) => None,
        Err(err) => {
            debug!(error = %err, "branch lookup unavailable");
            None
        }
    }
}

/// Get the remote URL for a named remote (usually `"origin"`).
///
/// Returns `None` if the remote does not exist.
#[instrument]
pub fn remote_url(remote: &str) -> GitResult<Option<String>> {
    match git(&["remote", "get-url", remote]) {
        Ok(url) => {
            let url = url.trim().to_string();
            debug!(%remote, %url, "remote URL");
            Ok(Some(url))
        }
        Err(GitError::Command { .. }) => Ok(None),
        Err(e) => Err(e),
    }
}

/// Parse owner and repo from a git remote URL.
///
/// Handles both HTTPS and SSH formats:
/// - `https://github.com/owner/repo.git`
/// - `git@github.com:owner/repo.git`
pub fn parse_owner_repo(url: &str) -> Option<(String, String)> {
    let path = url.strip_prefix("git@").map_or_else(
        || {
            url.split("//")
                .nth(1)
                .and_then(|after_scheme| after_scheme.split_once('/').map(|(_, path)| path))
        },
        |rest| rest.split_once(':').map(|(_, path)| path),
    )?;

    let path = path.strip_suffix(".git").unwrap_or(path);
    let (owner, repo) = path.split_once('/')?;

    if owner.is_empty() || repo.is_empty() || repo.contains('/') {
        return None;
    }

    Some((owner.to_string(), repo.to_string()))
}

/// Check if we're inside a git work tree.
#[instrument]
pub fn is_inside_repo() -> GitResult<bool> {
    match git(&["rev-parse", "--is-inside-work-tree"]) {
        Ok(output) => Ok(output.trim() == "true"),
        Err(GitError::Command { .. } | GitError::NotARepo) => Ok(false),
        Err(e) => Err(e),
    }
}

/// Run a git command and return its stdout.
fn git(args: &[&str]) -> GitResult<String> {
    let output = Command::new("git").args(args).output()?;

    if output.status.success() {
        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    } else {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();

        if stderr.contains("not a git repository") {
            return Err(GitError::NotARepo);
        }

        Err(GitError::Command {
            command: args.first().unwrap_or(&"").to_string(),
            stderr,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // These run inside or outside a checkout; they only assert what holds in both.

    #[test]
    fn is_inside_repo_returns_bool() {
        if git_available() {
            assert!(is_inside_repo().is_ok());
        }
    }

    #[test]
    fn head_ref_never_returns_empty() {
        if let Some(name) = head_ref() {
            assert!(!name.is_empty());
            assert_eq!(name, name.trim());
        }
    }

    #[test]
    fn abbrev_head_matches_head_ref_in_repo() {
        if git_available() && is_inside_repo().unwrap_or(false) {
            let direct = abbrev_head().unwrap();
            assert_eq!(head_ref().as_deref(), Some(direct.as_str()));
        }
    }

    #[test]
    fn git_error_on_bad_command() {
        if git_available() {
            assert!(git(&["not-a-real-subcommand"]).is_err());
        }
    }

    #[test]
    fn remote_url_missing_remote_is_none() {
        if git_available() && is_inside_repo().unwrap_or(false) {
            let url = remote_url("docref-no-such-remote").unwrap();
            assert!(url.is_none());
        }
    }

    #[test]
    fn parse_owner_repo_https() {
        let result = parse_owner_repo("https://github.com/framesjs/frames.js.git");
        assert_eq!(result, Some(("framesjs".into(), "frames.js".into())));
    }

    #[test]
    fn parse_owner_repo_https_no_suffix() {
        let result = parse_owner_repo("https://github.com/acme/widgets");
        assert_eq!(result, Some(("acme".into(), "widgets".into())));
    }

    #[test]
    fn parse_owner_repo_ssh() {
        let result = parse_owner_repo("git@github.com:acme/widgets.git");
        assert_eq!(result, Some(("acme".into(), "widgets".into())));
    }

    #[test]
    fn parse_owner_repo_invalid() {
        assert!(parse_owner_repo("not-a-url").is_none());
        assert!(parse_owner_repo("").is_none());
        assert!(parse_owner_repo("https://github.com/acme/widgets/tree/main").is_none());
    }
}
