use std::path::{Path, PathBuf};

pub const APP_DIR_NAME: &str = "betslip-analyzer";

/// Picks the data directory: command line, then config file, then the
/// platform data dir (`$XDG_DATA_HOME` or `~/.local/share` on Linux).
pub fn resolve_data_dir(
    cli: Option<&Path>,
    configured: Option<&Path>,
) -> Result<PathBuf, String> {
    if let Some(dir) = cli.or(configured) {
        return Ok(dir.to_path_buf());
    }
    let base = dirs::data_dir().ok_or_else(|| "resolve data dir".to_string())?;
    Ok(base.join(APP_DIR_NAME))
}
