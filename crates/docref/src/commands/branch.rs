//! Branch command: print the branch the site links against.

use clap::Args;
use owo_colors::OwoColorize;
use tracing::{debug, instrument};

use docref_core::branch::{BranchResolver, ResolvedBranch};
use docref_core::config::Config;

/// Arguments for the `branch` subcommand.
#[derive(Args, Debug, Default)]
pub struct BranchArgs {
    /// Also print which source produced the branch
    #[arg(long)]
    pub origin: bool,
}

/// Resolve and print the branch.
///
/// Plain output is the bare name so it can be captured with `$(docref branch)`.
#[instrument(name = "cmd_branch", skip_all, fields(json_output))]
pub fn cmd_branch(args: BranchArgs, global_json: bool, config: &Config) -> anyhow::Result<()> {
    debug!(json_output = global_json, "executing branch command");

    let resolved = BranchResolver::from_config(&config.branch).resolve();
    println!("{}", render(&resolved, args.origin, global_json)?);
    Ok(())
}

fn render(resolved: &ResolvedBranch, with_origin: bool, json: bool) -> anyhow::Result<String> {
    if json {
        return Ok(serde_json::to_string_pretty(resolved)?);
    }
    if with_origin {
        return Ok(format!(
            "{} {}",
            resolved.name,
            format!("({})", resolved.origin).dimmed()
        ));
    }
    Ok(resolved.name.to_string())
}
