//! Config file location.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Resolves the config file path.
///
/// - If `file` is `Some`, returns it unchanged.
/// - If `dir` is `Some`, returns `{dir}/config.toml`.
/// - Otherwise returns `~/.config/moviegrid/config.toml`.
///
/// # Errors
///
/// Returns an error if the home directory cannot be determined (when both are `None`).
pub fn resolve_config_path(dir: Option<&Path>, file: Option<&Path>) -> Result<PathBuf> {
    if let Some(f) = file {
        return Ok(f.to_path_buf());
    }
    if let Some(d) = dir {
        return Ok(d.join("config.toml"));
    }

    let home = std::env::var("HOME").context("HOME environment variable is not set")?;
    Ok(PathBuf::from(home)
        .join(".config")
        .join("moviegrid")
        .join("config.toml"))
}
