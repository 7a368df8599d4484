//! Range command: turn a version into its `major.minor.x` range.

use anyhow::Context;
use clap::Args;
use serde::Serialize;
use tracing::{debug, instrument};

use docref_core::version::{migration_anchor, parse_patch_range, patch_range};

/// Arguments for the `range` subcommand.
#[derive(Args, Debug)]
pub struct RangeArgs {
    /// Version to convert (e.g. 2.3.7)
    pub version: String,

    /// Fail on input that is not valid semver instead of formatting best-effort
    #[arg(long)]
    pub strict: bool,
}

#[derive(Serialize)]
struct RangeOutput {
    version: String,
    range: String,
    anchor: String,
}

/// Print the range for a version.
#[instrument(name = "cmd_range", skip_all, fields(version = %args.version, strict = args.strict))]
pub fn cmd_range(args: RangeArgs, global_json: bool) -> anyhow::Result<()> {
    debug!(json_output = global_json, "executing range command");

    let range = compute(&args)?;
    if global_json {
        let out = RangeOutput {
            anchor: migration_anchor(&range),
            version: args.version,
            range,
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        println!("{range}");
    }
    Ok(())
}

fn compute(args: &RangeArgs) -> anyhow::Result<String> {
    if args.strict {
        let range = parse_patch_range(&args.version)
            .with_context(|| format!("`{}` is not a valid version", args.version))?;
        Ok(range.to_string())
    } else {
        Ok(patch_range(&args.version))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(version: &str, strict: bool) -> RangeArgs {
        RangeArgs {
            version: version.to_string(),
            strict,
        }
    }

    #[test]
    fn best_effort_range() {
        assert_eq!(compute(&args("0.10.0", false)).unwrap(), "0.10.x");
        assert_eq!(compute(&args("5", false)).unwrap(), "5.x");
    }

    #[test]
    fn strict_range_strips_prefix() {
        assert_eq!(compute(&args("v2.3.7", true)).unwrap(), "2.3.x");
    }

    #[test]
    fn strict_range_rejects_short_input() {
        let err = compute(&args("5", true)).unwrap_err();
        assert!(err.to_string().contains("`5` is not a valid version"));
    }
}
