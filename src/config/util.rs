//! Configuration utility functions.

use std::path::{Path, PathBuf};

/// Find config file by searching upward from `start`
///
/// Walks up parent directories until finding `config_name`.
/// Returns the path to the config file if found.
///
/// # Example
/// ```text
/// /home/user/site/assets/scss/  ← start
/// /home/user/site/kiln.toml     ← found!
/// ```
pub fn find_config_file(start: &Path, config_name: &Path) -> Option<PathBuf> {
    if config_name.is_absolute() {
        return config_name.is_file().then(|| config_name.to_path_buf());
    }

    let mut current = start;
    loop {
        let candidate = current.join(config_name);
        if candidate.is_file() {
            return Some(candidate);
        }

        match current.parent() {
            Some(parent) => current = parent,
            None => return None,
        }
    }
}

/// Replace `{vendor}`, `{assets}` and `{dist}` placeholders in a pattern.
///
/// Other braces are left alone so `{a,b}` alternation survives.
pub fn expand_placeholders(pattern: &str, vars: &[(&str, &Path)]) -> String {
    let mut out = pattern.to_string();
    for (name, value) in vars {
        let token = format!("{{{name}}}");
        if out.contains(&token) {
            let value = value.to_string_lossy().replace('\\', "/");
            let value = value.trim_end_matches('/');
            out = out.replace(&token, value);
        }
    }
    out
}

// ============================================================================
// tests
// ============================================================================
