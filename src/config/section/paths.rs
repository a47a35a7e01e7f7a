//! `[paths]` and `[patterns]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [paths]
//! vendor = "node_modules"   # Third-party packages
//! assets = "assets"         # Project sources
//! dist = "dist"             # Build output
//!
//! [patterns]                # Relative to `paths.assets`, drive `kiln watch`
//! styles = "scss/**/*.scss"
//! scripts = "js/**/*.js"
//! images = "img/**/*.{jpg,jpeg,png,gif}"
//! ```

use crate::config::{ConfigDiagnostics, FieldPath};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Root directories, relative to the project root.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Installed third-party packages (`{vendor}`).
    pub vendor: PathBuf,
    /// Project sources (`{assets}`).
    pub assets: PathBuf,
    /// Build output (`{dist}`).
    pub dist: PathBuf,
}

pub struct PathsFields {
    pub vendor: FieldPath,
    pub assets: FieldPath,
    pub dist: FieldPath,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            vendor: "node_modules".into(),
            assets: "assets".into(),
            dist: "dist".into(),
        }
    }
}

impl PathsConfig {
    pub const FIELDS: PathsFields = PathsFields {
        vendor: FieldPath::new("paths.vendor"),
        assets: FieldPath::new("paths.assets"),
        dist: FieldPath::new("paths.dist"),
    };

    /// Validate path settings against the project root.
    ///
    /// # Checks
    /// - every path is non-empty
    /// - `dist` is not the project root itself
    /// - a missing `vendor` directory is only a warning
    pub fn validate(&self, root: &Path, diag: &mut ConfigDiagnostics) {
        let fields = Self::FIELDS;
        for (field, path) in [
            (fields.vendor, &self.vendor),
            (fields.assets, &self.assets),
            (fields.dist, &self.dist),
        ] {
            if path.as_os_str().is_empty() {
                diag.error(field, "path must not be empty");
            }
        }

        if !self.dist.as_os_str().is_empty()
            && crate::utils::path::normalize_path(&root.join(&self.dist))
                == crate::utils::path::normalize_path(root)
        {
            diag.error_with_hint(
                fields.dist,
                "output directory is the project root",
                "use a dedicated directory such as \"dist\"",
            );
        }

        if !self.vendor.as_os_str().is_empty() && !root.join(&self.vendor).is_dir() {
            diag.warn(
                fields.vendor,
                format!("directory `{}` does not exist", self.vendor.display()),
            );
        }
    }
}

/// Source patterns, relative to `paths.assets`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PatternsConfig {
    pub styles: String,
    pub scripts: String,
    pub images: String,
}

pub struct PatternsFields {
    pub styles: FieldPath,
    pub scripts: FieldPath,
    pub images: FieldPath,
}

impl Default for PatternsConfig {
    fn default() -> Self {
        Self {
            styles: "scss/**/*.scss".into(),
            scripts: "js/**/*.js".into(),
            images: "img/**/*.{jpg,jpeg,png,gif}".into(),
        }
    }
}

impl PatternsConfig {
    pub const FIELDS: PatternsFields = PatternsFields {
        styles: FieldPath::new("patterns.styles"),
        scripts: FieldPath::new("patterns.scripts"),
        images: FieldPath::new("patterns.images"),
    };

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        let fields = Self::FIELDS;
        for (field, pattern) in [
            (fields.styles, &self.styles),
            (fields.scripts, &self.scripts),
            (fields.images, &self.images),
        ] {
            if pattern.trim().is_empty() {
                diag.error(field, "pattern must not be empty");
            } else if let Err(e) = crate::glob::Pattern::new(pattern) {
                diag.error(field, e.to_string());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;

    #[test]
    fn test_defaults() {
        let config = test_parse_config("");
        assert_eq!(config.paths.vendor, PathBuf::from("node_modules"));
        assert_eq!(config.paths.assets, PathBuf::from("assets"));
        assert_eq!(config.paths.dist, PathBuf::from("dist"));
        assert_eq!(config.patterns.styles, "scss/**/*.scss");
        assert_eq!(config.patterns.scripts, "js/**/*.js");
        assert_eq!(config.patterns.images, "img/**/*.{jpg,jpeg,png,gif}");
    }

    #[test]
    fn test_partial_override() {
        let config = test_parse_config("[paths]\ndist = \"public\"\n[patterns]\nstyles = \"css/*.css\"");
        assert_eq!(config.paths.dist, PathBuf::from("public"));
        assert_eq!(config.paths.assets, PathBuf::from("assets"));
        assert_eq!(config.patterns.styles, "css/*.css");
        assert_eq!(config.patterns.scripts, "js/**/*.js");
    }

    #[test]
    fn test_validate_empty_and_root_dist() {
        let dir = tempfile::TempDir::new().unwrap();
        let paths = PathsConfig {
            vendor: PathBuf::new(),
            assets: "assets".into(),
            dist: ".".into(),
        };
        let mut diag = ConfigDiagnostics::new();
        paths.validate(dir.path(), &mut diag);

        let fields: Vec<_> = diag.errors().iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["paths.vendor", "paths.dist"]);
    }

    #[test]
    fn test_validate_missing_vendor_warns() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut diag = ConfigDiagnostics::new();
        PathsConfig::default().validate(dir.path(), &mut diag);

        assert!(diag.is_empty());
        assert_eq!(diag.warnings().len(), 1);
        assert_eq!(diag.warnings()[0].0.as_str(), "paths.vendor");
    }

    #[test]
    fn test_validate_bad_pattern() {
        let patterns = PatternsConfig {
            styles: "scss/{a,b.scss".into(),
            scripts: " ".into(),
            ..PatternsConfig::default()
        };
        let mut diag = ConfigDiagnostics::new();
        patterns.validate(&mut diag);
        assert_eq!(diag.len(), 2);
    }
}
