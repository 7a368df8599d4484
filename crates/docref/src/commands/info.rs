//! Info command: show package, config, and resolved site environment.

use camino::{Utf8Path, Utf8PathBuf};
use clap::Args;
use owo_colors::OwoColorize;
use serde::Serialize;
use tracing::{debug, instrument};

use docref_core::SiteEnv;
use docref_core::config::Config;

/// Arguments for the `info` subcommand.
#[derive(Args, Debug, Default)]
pub struct InfoArgs {
    // No subcommand-specific arguments; uses global --json flag
}

#[derive(Serialize)]
struct PackageInfo {
    name: &'static str,
    version: &'static str,
    #[serde(skip_serializing_if = "str::is_empty")]
    description: &'static str,
    #[serde(skip_serializing_if = "str::is_empty")]
    repository: &'static str,
    #[serde(skip_serializing_if = "str::is_empty")]
    license: &'static str,
}

impl PackageInfo {
    const fn new() -> Self {
        Self {
            name: env!("CARGO_PKG_NAME"),
            version: env!("CARGO_PKG_VERSION"),
            description: env!("CARGO_PKG_DESCRIPTION"),
            repository: env!("CARGO_PKG_REPOSITORY"),
            license: env!("CARGO_PKG_LICENSE"),
        }
    }
}

#[derive(Serialize)]
struct ConfigInfo {
    /// Merged config files, lowest precedence first.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    config_files: Vec<String>,
    log_level: &'static str,
    branch_env_var: String,
    default_branch: String,
    manifest: String,
}

impl ConfigInfo {
    fn from_config(config: &Config, sources: &[Utf8PathBuf]) -> Self {
        Self {
            config_files: sources.iter().map(ToString::to_string).collect(),
            log_level: config.log_level.as_str(),
            branch_env_var: config.branch.env_var.clone(),
            default_branch: config.branch.default.clone(),
            manifest: config.package.manifest.to_string(),
        }
    }
}

#[derive(Serialize)]
struct FullInfo {
    #[serde(flatten)]
    package: PackageInfo,
    config: ConfigInfo,
    site: SiteEnv,
}

/// Print package information and the resolved site environment.
#[instrument(name = "cmd_info", skip_all, fields(json_output))]
pub fn cmd_info(
    _args: InfoArgs,
    global_json: bool,
    config: &Config,
    sources: &[Utf8PathBuf],
    cwd: &Utf8Path,
) -> anyhow::Result<()> {
    debug!(json_output = global_json, "executing info command");

    let info = FullInfo {
        package: PackageInfo::new(),
        config: ConfigInfo::from_config(config, sources),
        site: SiteEnv::resolve(config, cwd),
    };

    if global_json {
        println!("{}", serde_json::to_string_pretty(&info)?);
        return Ok(());
    }

    println!(
        "{} {}",
        info.package.name.bold(),
        info.package.version.green()
    );
    if !info.package.description.is_empty() {
        println!("{}", info.package.description);
    }
    if !info.package.license.is_empty() {
        println!("{}: {}", "License".dimmed(), info.package.license);
    }
    if !info.package.repository.is_empty() {
        println!(
            "{}: {}",
            "Repository".dimmed(),
            info.package.repository.cyan()
        );
    }

    println!();
    println!("{}", "Configuration".bold().underline());
    if info.config.config_files.is_empty() {
        println!("{}: {}", "Config file".dimmed(), "none loaded".yellow());
    }
    for path in &info.config.config_files {
        println!("{}: {}", "Config file".dimmed(), path.cyan());
    }
    println!("{}: {}", "Log level".dimmed(), info.config.log_level);
    println!("{}: {}", "Branch variable".dimmed(), info.config.branch_env_var);
    println!("{}: {}", "Default branch".dimmed(), info.config.default_branch);
    println!("{}: {}", "Manifest".dimmed(), info.config.manifest);

    println!();
    println!("{}", "Site Environment".bold().underline());
    println!(
        "{}: {} {}",
        "Branch".dimmed(),
        info.site.branch.name.cyan(),
        format!("({})", info.site.branch.origin).dimmed()
    );
    match (&info.site.version, &info.site.version_range) {
        (Some(version), Some(range)) => {
            println!("{}: {}", "Version".dimmed(), version);
            println!("{}: {}", "Version range".dimmed(), range.cyan());
        }
        _ => println!(
            "  {} {}",
            "○".yellow(),
            "No package version found".yellow()
        ),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_cwd() -> camino::Utf8PathBuf {
        camino::Utf8PathBuf::from("/tmp")
    }

    #[test]
    fn test_cmd_info_text_succeeds() {
        assert!(cmd_info(InfoArgs::default(), false, &Config::default(), &[], &test_cwd()).is_ok());
    }

    #[test]
    fn test_cmd_info_json_via_global() {
        assert!(cmd_info(InfoArgs::default(), true, &Config::default(), &[], &test_cwd()).is_ok());
    }

    #[test]
    fn test_config_info_no_file() {
        let info = ConfigInfo::from_config(&Config::default(), &[]);
        assert!(info.config_files.is_empty());
        assert_eq!(info.log_level, "info");
        assert_eq!(info.branch_env_var, "VERCEL_GIT_COMMIT_REF");
        assert_eq!(info.default_branch, "main");

        let json = serde_json::to_value(&info).unwrap();
        assert!(json.get("config_files").is_none());
    }

    #[test]
    fn test_config_info_lists_merged_files() {
        let sources = [
            Utf8PathBuf::from("/home/dev/.config/docref/config.toml"),
            Utf8PathBuf::from("/work/site/ci.toml"),
        ];
        let info = ConfigInfo::from_config(&Config::default(), &sources);
        assert_eq!(
            info.config_files,
            ["/home/dev/.config/docref/config.toml", "/work/site/ci.toml"]
        );
    }
}
