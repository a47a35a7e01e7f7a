//! `clean`: empty the dist output subdirectories.

use std::fs;
use std::path::PathBuf;

use crate::config::KilnConfig;
use crate::debug;
use crate::pipeline::{IoContext, KilnError};

/// Remove every entry under `{dist}/{css,font,img,js}`.
///
/// The directories themselves are kept; missing ones are not created.
/// Returns the removed top-level entries.
pub fn clean(config: &KilnConfig) -> Result<Vec<PathBuf>, KilnError> {
    let mut removed = Vec::new();

    for dir in config.output_dirs() {
        if !dir.is_dir() {
            continue;
        }
        for entry in fs::read_dir(&dir).at(&dir)? {
            let path = entry.at(&dir)?.path();
            debug!("clean"; "{}", config.root_relative(&path).display());
            if path.is_dir() && !path.is_symlink() {
                fs::remove_dir_all(&path).at(&path)?;
            } else {
                fs::remove_file(&path).at(&path)?;
            }
            removed.push(path);
        }
    }

    Ok(removed)
}
