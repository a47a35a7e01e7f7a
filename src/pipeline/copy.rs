//! Byte-for-byte copies (fonts and other static files).

use std::fs;
use std::path::{Path, PathBuf};

use rustc_hash::FxHashSet;

use super::{IoContext, KilnError};
use crate::config::KilnConfig;
use crate::debug;
use crate::freshness::is_newer_than;
use crate::glob::Pattern;

/// Copy every file matched by `patterns` into `out_dir`.
///
/// Destinations keep the path relative to the pattern's literal base
/// (a literal input lands directly in `out_dir`). A destination that is
/// at least as new as its source is left alone.
///
/// Returns the destination of every matched file.
pub fn copy(
    config: &KilnConfig,
    patterns: &[String],
    out_dir: &Path,
) -> Result<Vec<PathBuf>, KilnError> {
    let root = config.get_root();
    let mut seen = FxHashSet::default();
    let mut outputs = Vec::new();

    for raw in patterns {
        let pattern = Pattern::new(&config.expand(raw))?;
        let base = root.join(pattern.base());

        for source in pattern.expand(root)? {
            if !seen.insert(source.clone()) {
                continue;
            }
            let dest = destination(&pattern, &base, &source, out_dir);
            if dest.exists() && !is_newer_than(&source, &dest) {
                outputs.push(dest);
                continue;
            }

            debug!("copy"; "{} -> {}", config.root_relative(&source).display(), config.root_relative(&dest).display());
            if let Some(parent) = dest.parent() {
                fs::create_dir_all(parent).at(parent)?;
            }
            fs::copy(&source, &dest).at(&source)?;
            outputs.push(dest);
        }
    }

    Ok(outputs)
}

fn destination(pattern: &Pattern, base: &Path, source: &Path, out_dir: &Path) -> PathBuf {
    if pattern.is_literal() {
        return out_dir.join(source.file_name().unwrap_or_default());
    }
    match source.strip_prefix(base) {
        Ok(rel) => out_dir.join(rel),
        Err(_) => out_dir.join(source.file_name().unwrap_or_default()),
    }
}
