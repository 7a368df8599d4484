//! docref CLI
#![deny(unsafe_code)]

use anyhow::Context;
use clap::Parser;
use docref::{Cli, Commands, commands};
use docref_core::config::ConfigLoader;
use tracing::debug;

mod observability;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    cli.color.apply();

    if let Some(ref dir) = cli.chdir {
        std::env::set_current_dir(dir)
            .with_context(|| format!("failed to change directory to {}", dir.display()))?;
    }

    let cwd = std::env::current_dir().context("failed to determine current directory")?;
    let cwd = camino::Utf8PathBuf::try_from(cwd).map_err(|e| {
        anyhow::anyhow!(
            "current directory is not valid UTF-8: {}",
            e.into_path_buf().display()
        )
    })?;
    let mut loader = ConfigLoader::new().with_project_search(&cwd);
    if let Some(ref config_path) = cli.config {
        let config_path = camino::Utf8PathBuf::try_from(config_path.clone()).map_err(|e| {
            anyhow::anyhow!(
                "config path is not valid UTF-8: {}",
                e.into_path_buf().display()
            )
        })?;
        loader = loader.with_file(&config_path);
    }
    let (config, config_sources) = loader
        .load_with_sources()
        .context("failed to load configuration")?;

    let obs_config = observability::ObservabilityConfig::new(config.log_dir.clone());
    let env_filter = observability::env_filter(cli.quiet, cli.verbose, config.log_level.as_str());
    let guard = observability::init_observability(&obs_config, env_filter)
        .context("failed to initialize logging")?;

    debug!(
        verbose = cli.verbose,
        quiet = cli.quiet,
        json = cli.json,
        color = ?cli.color,
        chdir = ?cli.chdir,
        "CLI initialized"
    );

    let result = match cli.command {
        Commands::Branch(args) => {
            commands::branch::cmd_branch(args, cli.json, &config).map(|()| 0)
        }
        Commands::Range(args) => commands::range::cmd_range(args, cli.json).map(|()| 0),
        Commands::Env(args) => commands::env::cmd_env(args, cli.json, &config, &cwd).map(|()| 0),
        Commands::Exec(args) => commands::exec::cmd_exec(args, &config, &cwd),
        Commands::Links(args) => {
            commands::links::cmd_links(args, cli.json, &config, &cwd).map(|()| 0)
        }
        Commands::Info(args) => {
            commands::info::cmd_info(args, cli.json, &config, &config_sources, &cwd).map(|()| 0)
        }
        Commands::Doctor(args) => {
            commands::doctor::cmd_doctor(args, cli.json, &config, &config_sources, &cwd)
                .map(|()| 0)
        }
    };
    match result {
        Ok(0) => Ok(()),
        Ok(code) => {
            // process::exit skips destructors; flush buffered log lines first.
            drop(guard);
            std::process::exit(code);
        }
        Err(err) => {
            tracing::error!(error = %err, "fatal error");
            Err(err)
        }
    }
}
