//! Env command: print the site environment for a downstream build.
//!
//! ```sh
//! eval "$(docref env --shell)"
//! ```

use camino::Utf8Path;
use clap::Args;
use serde_json::{Map, Value};
use tracing::{debug, instrument};

use docref_core::SiteEnv;
use docref_core::config::Config;

/// Arguments for the `env` subcommand.
#[derive(Args, Debug, Default)]
pub struct EnvArgs {
    /// Emit `export KEY='value'` lines for `eval`
    #[arg(long)]
    pub shell: bool,
}

/// Print the exports of the resolved site environment.
#[instrument(name = "cmd_env", skip_all, fields(shell = args.shell))]
pub fn cmd_env(
    args: EnvArgs,
    global_json: bool,
    config: &Config,
    cwd: &Utf8Path,
) -> anyhow::Result<()> {
    debug!(json_output = global_json, "executing env command");

    let site = SiteEnv::resolve(config, cwd);
    print!("{}", render(&site.exports(), args.shell, global_json)?);
    Ok(())
}

fn render(exports: &[(&str, &str)], shell: bool, json: bool) -> anyhow::Result<String> {
    if json {
        let map: Map<String, Value> = exports
            .iter()
            .map(|(name, value)| ((*name).to_string(), Value::String((*value).to_string())))
            .collect();
        return Ok(format!("{}\n", serde_json::to_string_pretty(&map)?));
    }

    let mut out = String::new();
    for (name, value) in exports {
        if shell {
            out.push_str(&format!("export {name}={}\n", shell_quote(value)));
        } else {
            out.push_str(&format!("{name}={value}\n"));
        }
    }
    Ok(out)
}

/// Single-quote `value` for POSIX shells.
fn shell_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', r"'\''"))
}
