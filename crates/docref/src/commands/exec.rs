//! Exec command: run a build with the site environment applied.
//!
//! ```sh
//! docref exec -- npx vocs build
//! ```
//!
//! The child inherits this process's environment plus the exports of the
//! resolved [`SiteEnv`]. Its exit status becomes ours.

use std::process::Command;

use anyhow::Context;
use camino::Utf8Path;
use clap::Args;
use tracing::{debug, info, instrument};

use docref_core::SiteEnv;
use docref_core::config::Config;

/// Arguments for the `exec` subcommand.
#[derive(Args, Debug)]
pub struct ExecArgs {
    /// Program to run, followed by its arguments
    #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
    pub command: Vec<String>,
}

/// Run the command and return its exit code.
#[instrument(name = "cmd_exec", skip_all, fields(program))]
pub fn cmd_exec(args: ExecArgs, config: &Config, cwd: &Utf8Path) -> anyhow::Result<i32> {
    let site = SiteEnv::resolve(config, cwd);
    run(&args.command, &site, cwd)
}

fn run(command: &[String], site: &SiteEnv, cwd: &Utf8Path) -> anyhow::Result<i32> {
    let (program, rest) = command.split_first().context("no command given")?;
    tracing::Span::current().record("program", program.as_str());

    let exports = site.exports();
    debug!(?exports, "spawning child");

    let status = Command::new(program)
        .args(rest)
        .envs(exports.iter().copied())
        .current_dir(cwd.as_std_path())
        .status()
        .with_context(|| format!("failed to run `{program}`"))?;

    info!(%status, "child exited");
    // Signal-terminated children have no code.
    Ok(status.code().unwrap_or(1))
}
