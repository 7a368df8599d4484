//! Links command: print the migration-guide and online-editor links.

use anyhow::Context;
use camino::Utf8Path;
use clap::Args;
use owo_colors::OwoColorize;
use serde::Serialize;
use tracing::{debug, instrument};

use docref_core::SiteEnv;
use docref_core::config::Config;
use docref_core::links::{self, RepoCoords};

/// Arguments for the `links` subcommand.
#[derive(Args, Debug, Default)]
pub struct LinksArgs {
    /// Example directory to open in the online editor (e.g. examples/basic)
    #[arg(long, value_name = "PATH")]
    pub example: Option<String>,
}

#[derive(Serialize, Debug, PartialEq, Eq)]
struct LinkReport {
    branch: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    version_range: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    migration: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    editor: Option<String>,
}

impl LinkReport {
    fn build(
        site: &SiteEnv,
        config: &Config,
        repo: Option<&RepoCoords>,
        example: Option<&str>,
    ) -> Self {
        Self {
            branch: site.branch.name.to_string(),
            version_range: site.version_range.clone(),
            migration: site
                .version_range
                .as_deref()
                .map(|range| links::migration_url(&config.links.migration_guide, range)),
            editor: repo.zip(example).map(|(repo, path)| {
                links::editor_url(&config.links.editor_base, repo, &site.branch.name, path)
            }),
        }
    }
}

/// Print links for the resolved site environment.
#[instrument(name = "cmd_links", skip_all, fields(example = ?args.example))]
pub fn cmd_links(
    args: LinksArgs,
    global_json: bool,
    config: &Config,
    cwd: &Utf8Path,
) -> anyhow::Result<()> {
    debug!(json_output = global_json, "executing links command");

    let site = SiteEnv::resolve(config, cwd);
    // Only the editor link needs the repository.
    let repo = match args.example {
        Some(_) => {
            let repo = links::repo_coords(&config.links)
                .context("cannot build the editor link")?;
            Some(repo)
        }
        None => None,
    };
    let report = LinkReport::build(&site, config, repo.as_ref(), args.example.as_deref());

    if global_json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("{}: {}", "Branch".dimmed(), report.branch.cyan());
    match (&report.version_range, &report.migration) {
        (Some(range), Some(url)) => {
            println!("{}: {}", "Version range".dimmed(), range);
            println!("{}: {}", "Migration guide".dimmed(), url.cyan());
        }
        _ => println!(
            "  {} {}",
            "○".yellow(),
            "No package version; migration link skipped".yellow()
        ),
    }
    if let Some(ref url) = report.editor {
        println!("{}: {}", "Editor".dimmed(), url.cyan());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use docref_core::BranchResolver;

    fn site(config: &Config) -> SiteEnv {
        let resolver = BranchResolver::new("DOCREF_TEST_UNSET_REF", "main")
            .with_env(|_: &str| Some("pr-17".to_string()))
            .with_git(|| None);
        SiteEnv::resolve_with(config, Utf8Path::new("/nonexistent"), &resolver)
    }

    fn repo() -> RepoCoords {
        RepoCoords {
            owner: "acme".to_string(),
            repo: "widgets".to_string(),
        }
    }

    #[test]
    fn report_with_version_and_example() {
        let mut config = Config::default();
        config.package.version = Some("0.10.4".to_string());

        let site = site(&config);
        let report = LinkReport::build(&site, &config, Some(&repo()), Some("examples/basic"));

        assert_eq!(report.branch, "pr-17");
        assert_eq!(report.version_range.as_deref(), Some("0.10.x"));
        assert_eq!(
            report.migration.as_deref(),
            Some("/guides/migration-guide#_0-10-x-breaking-changes")
        );
        assert_eq!(
            report.editor.as_deref(),
            Some("https://stackblitz.com/github/acme/widgets/tree/pr-17/examples/basic")
        );
    }

    #[test]
    fn report_without_version_or_example() {
        let config = Config::default();
        let report = LinkReport::build(&site(&config), &config, None, None);

        assert!(report.migration.is_none());
        assert!(report.editor.is_none());

        let json = serde_json::to_value(&report).unwrap();
        assert!(json.get("migration").is_none());
    }

    #[test]
    fn test_cmd_links_without_example_succeeds() {
        let mut config = Config::default();
        config.package.version = Some("1.2.3".to_string());
        assert!(cmd_links(LinksArgs::default(), true, &config, Utf8Path::new("/tmp")).is_ok());
    }
}
