pub mod completions;
pub mod man;

use std::fs;
use std::path::{Path, PathBuf};

/// Binary name used for generated file names.
pub const BIN_NAME: &str = "docref";

/// Resolve `rel` against the workspace root and create it.
pub fn prepare_out_dir(rel: &Path) -> Result<PathBuf, String> {
    let out_dir = crate::workspace_root().join(rel);
    fs::create_dir_all(&out_dir).map_err(|e| format!("{}: {e}", out_dir.display()))?;
    Ok(out_dir)
}
