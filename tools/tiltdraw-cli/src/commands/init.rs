//! Write a default configuration file.

use std::path::{Path, PathBuf};

use tiltdraw_common::config::{config_file_path, AppConfig};

/// Write defaults to `path`, or to the standard location when `None`.
///
/// An existing file is kept unless `force` is set.
pub fn run(path: Option<&Path>, force: bool) -> anyhow::Result<PathBuf> {
    let target = path.map_or_else(config_file_path, Path::to_path_buf);
    if target.exists() && !force {
        anyhow::bail!(
            "{} already exists (pass --force to overwrite)",
            target.display()
        );
    }

    let config = AppConfig::default();
    match path {
        Some(path) => config.save_to(path)?,
        None => config.save()?,
    }

    println!("Wrote default configuration to {}", target.display());
    Ok(target)
}
