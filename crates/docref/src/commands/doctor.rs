//! Doctor command: diagnose configuration and environment.

use camino::{Utf8Path, Utf8PathBuf};
use clap::Args;
use docref_core::config::{self, Config};
use docref_core::git;
use indicatif::{ProgressBar, ProgressStyle};
use inquire::Confirm;
use owo_colors::OwoColorize;
use serde::Serialize;
use tracing::{debug, instrument};

/// Arguments for the `doctor` subcommand.
#[derive(Args, Debug, Default)]
pub struct DoctorArgs {
    // No subcommand-specific arguments; uses global --json flag
}

#[derive(Serialize)]
struct DoctorReport {
    directories: DirectoryPaths,
    config: ConfigStatus,
    git: GitStatus,
    environment: EnvironmentInfo,
}

#[derive(Serialize)]
struct DirectoryPaths {
    config: Option<String>,
    cache: Option<String>,
    data_local: Option<String>,
}

#[derive(Serialize)]
struct ConfigStatus {
    /// Config files that were merged, lowest precedence first
    files: Vec<String>,
    /// Whether any config file was loaded
    found: bool,
}

#[derive(Serialize)]
struct GitStatus {
    /// `git` found on PATH
    available: bool,
    /// Working directory is inside a work tree
    inside_repo: bool,
    /// What `git rev-parse --abbrev-ref HEAD` reports
    head: Option<String>,
}

#[derive(Serialize)]
struct EnvironmentInfo {
    cwd: String,
    env_vars: Vec<EnvVar>,
}

#[derive(Serialize)]
struct EnvVar {
    name: String,
    value: Option<String>,
    description: &'static str,
}

impl EnvVar {
    fn read(name: &str, description: &'static str) -> Self {
        Self {
            name: name.to_string(),
            value: std::env::var(name).ok(),
            description,
        }
    }
}

impl DoctorReport {
    fn gather(config: &Config, sources: &[Utf8PathBuf], cwd: &Utf8Path) -> Self {
        let available = git::git_available();
        let inside_repo = available && git::is_inside_repo().unwrap_or(false);

        Self {
            directories: DirectoryPaths {
                config: config::user_config_dir().map(|p| p.to_string()),
                cache: config::user_cache_dir().map(|p| p.to_string()),
                data_local: config::user_data_local_dir().map(|p| p.to_string()),
            },
            config: ConfigStatus {
                found: !sources.is_empty(),
                files: sources.iter().map(ToString::to_string).collect(),
            },
            git: GitStatus {
                available,
                inside_repo,
                head: inside_repo.then(git::head_ref).flatten(),
            },
            environment: EnvironmentInfo {
                cwd: cwd.to_string(),
                env_vars: vec![
                    EnvVar::read(&config.branch.env_var, "Branch from the hosting platform"),
                    EnvVar::read(
                        &config.branch.export_var,
                        "Branch export (normally set by docref)",
                    ),
                    EnvVar::read("XDG_CONFIG_HOME", "Override config directory"),
                    EnvVar::read("RUST_LOG", "Log filter directive"),
                    EnvVar::read("DOCREF_LOG_PATH", "Explicit log file path"),
                    EnvVar::read("DOCREF_LOG_DIR", "Log directory"),
                ],
            },
        }
    }
}

/// Run diagnostics and report configuration status.
#[instrument(name = "cmd_doctor", skip_all, fields(json_output))]
pub fn cmd_doctor(
    _args: DoctorArgs,
    global_json: bool,
    config: &Config,
    sources: &[Utf8PathBuf],
    cwd: &Utf8Path,
) -> anyhow::Result<()> {
    debug!(json_output = global_json, "executing doctor command");

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}")?);
    spinner.set_message("Gathering diagnostics...");
    spinner.enable_steady_tick(std::time::Duration::from_millis(80));

    let report = DoctorReport::gather(config, sources, cwd);
    spinner.finish_and_clear();

    if global_json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("{}", "Configuration".bold().underline());
    if report.config.found {
        for file in &report.config.files {
            println!("  {} Config file: {}", "✓".green(), file.cyan());
        }
    } else {
        println!("  {} No config file found", "○".yellow());
        offer_config_creation()?;
    }
    println!();

    println!("{}", "Git".bold().underline());
    if !report.git.available {
        println!("  {} git not found on PATH; branch falls back to default", "✗".red());
    } else if !report.git.inside_repo {
        println!("  {} Not inside a git work tree", "○".yellow());
    } else {
        println!(
            "  {} HEAD: {}",
            "✓".green(),
            report.git.head.as_deref().unwrap_or("(empty)").cyan()
        );
    }
    println!();

    println!("{}", "Directories".bold().underline());
    print_dir("  Config", report.directories.config.as_deref());
    print_dir("  Cache", report.directories.cache.as_deref());
    print_dir("  Data (local)", report.directories.data_local.as_deref());
    println!();

    println!("{}", "Environment".bold().underline());
    println!("  {}: {}", "Working directory".dimmed(), report.environment.cwd.cyan());
    let set_vars: Vec<_> = report
        .environment
        .env_vars
        .iter()
        .filter(|v| v.value.is_some())
        .collect();
    if set_vars.is_empty() {
        println!("  {} No branch or logging overrides set", "○".dimmed());
    } else {
        for var in set_vars {
            println!(
                "  {}: {}",
                var.name.dimmed(),
                var.value.as_deref().unwrap_or("").cyan()
            );
        }
    }

    Ok(())
}

fn print_dir(label: &str, path: Option<&str>) {
    print!("{}: ", label.dimmed());
    match path {
        Some(p) => println!("{}", p.cyan()),
        None => println!("{}", "(unavailable)".yellow()),
    }
}

/// Offer to write a default config file when none exists.
fn offer_config_creation() -> anyhow::Result<()> {
    let Some(config_dir) = config::user_config_dir() else {
        return Ok(());
    };

    if !std::io::IsTerminal::is_terminal(&std::io::stdin()) {
        return Ok(());
    }

    let config_path = config_dir.join("config.yaml");
    let create = Confirm::new("Create a default config file?")
        .with_default(false)
        .with_help_message(&format!("Will create {config_path}"))
        .prompt();

    // Declined or interrupted: nothing to do.
    if let Ok(true) = create {
        std::fs::create_dir_all(&config_dir)?;
        let yaml = serde_saphyr::to_string(&Config::default())?;
        std::fs::write(&config_path, yaml)?;
        println!("  {} Created {}", "✓".green(), config_path.cyan());
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
    fn test_cmd_doctor_text_succeeds() {
        let config = Config::default();
        assert!(cmd_doctor(DoctorArgs::default(), false, &config, &[], &test_cwd()).is_ok());
    }

    #[test]
    fn test_cmd_doctor_json_succeeds() {
        let config = Config::default();
        assert!(cmd_doctor(DoctorArgs::default(), true, &config, &[], &test_cwd()).is_ok());
    }

    #[test]
    fn test_doctor_report_lists_configured_branch_var() {
        let mut config = Config::default();
        config.branch.env_var = "CF_PAGES_BRANCH".to_string();

        let report = DoctorReport::gather(&config, &[], &test_cwd());

        assert_eq!(report.environment.env_vars[0].name, "CF_PAGES_BRANCH");
        assert!(report.git.inside_repo || report.git.head.is_none());
        assert!(!report.config.found);
    }

    #[test]
    fn test_doctor_report_uses_loaded_sources() {
        let sources = [Utf8PathBuf::from("/work/site/ci.toml")];

        let report = DoctorReport::gather(&Config::default(), &sources, &test_cwd());

        assert!(report.config.found);
        assert_eq!(report.config.files, ["/work/site/ci.toml"]);
    }
}
