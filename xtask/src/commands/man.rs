use std::fs;
use std::path::{Path, PathBuf};

use clap::Args;

use super::{BIN_NAME, prepare_out_dir};

#[derive(Args, Debug)]
pub struct ManArgs {
    /// Output directory (default: dist/share/man/man1)
    #[arg(long = "out-dir", default_value = "dist/share/man/man1")]
    pub out_dir: PathBuf,
}

pub fn cmd_man(args: ManArgs) -> Result<(), String> {
    let out_dir = prepare_out_dir(&args.out_dir)?;
    let cmd = docref::command();

    write_page(&out_dir, BIN_NAME, cmd.clone())?;
    // One page per subcommand: docref-branch.1, docref-range.1, ...
    for sub in cmd.get_subcommands() {
        write_page(&out_dir, &format!("{BIN_NAME}-{}", sub.get_name()), sub.clone())?;
    }

    Ok(())
}

fn write_page(out_dir: &Path, stem: &str, cmd: clap::Command) -> Result<(), String> {
    let mut buffer: Vec<u8> = Vec::new();
    clap_mangen::Man::new(cmd)
        .render(&mut buffer)
        .map_err(|e| format!("render manpage for {stem}: {e}"))?;

    let path = out_dir.join(format!("{stem}.1"));
    fs::write(&path, buffer).map_err(|e| format!("{}: {e}", path.display()))?;
    println!("wrote {}", path.display());
    Ok(())
}
