//! Project configuration management for `kiln.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # Configuration section definitions
//! │   ├── paths      # [paths], [patterns]
//! │   ├── bundle     # [[styles.bundle]], [[scripts.bundle]]
//! │   ├── styles     # [styles]
//! │   ├── scripts    # [scripts]
//! │   ├── assets     # [images], [fonts]
//! │   └── serve      # [serve], [watch]
//! ├── types/         # Utility types
//! │   ├── error      # ConfigError, ConfigDiagnostics
//! │   ├── field      # FieldPath
//! │   └── handle     # Global config handle
//! └── mod.rs         # KilnConfig (this file)
//! ```
//!
//! The file is optional. Without one, the defaults describe the classic
//! `assets/` → `dist/` layout with packages under `node_modules/`.

pub mod section;
pub mod types;
mod util;

use util::{expand_placeholders, find_config_file};

pub use section::{
    BundleConfig, FontsConfig, ImagesConfig, PathsConfig, PatternsConfig,
    ScriptsConfig, ServeConfig, StylesConfig, WatchConfig,
};
pub use types::{ConfigDiagnostics, ConfigError, FieldPath, cfg, init_config, reload_config};

use crate::{cli::Cli, core::Mode, log};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Config file name searched for when `--config` is not given.
pub const DEFAULT_CONFIG: &str = "kiln.toml";

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing kiln.toml
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct KilnConfig {
    /// CLI arguments reference (internal use only)
    #[serde(skip)]
    pub cli: Option<&'static Cli>,

    /// Absolute path to the config file, which may not exist (internal use only)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Project root directory (internal use only)
    #[serde(skip)]
    pub root: PathBuf,

    /// Build mode resolved from `--production` / `KILN_ENV` (internal use only)
    #[serde(skip)]
    pub mode: Mode,

    pub paths: PathsConfig,
    pub patterns: PatternsConfig,
    pub styles: StylesConfig,
    pub scripts: ScriptsConfig,
    pub images: ImagesConfig,
    pub fonts: FontsConfig,
    pub serve: ServeConfig,
    pub watch: WatchConfig,
}

impl KilnConfig {
    /// Load configuration from CLI arguments.
    ///
    /// Searches upward from cwd for the config file. The project root is the
    /// config file's parent directory, or cwd when no file exists.
    pub fn load(cli: &'static Cli) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current working directory")?;
        let (config_path, exists) = Self::resolve_config_path(cli, &cwd)?;

        let mut config = if exists {
            Self::from_path(&config_path)?
        } else {
            crate::debug!("config"; "no {} found, using defaults", DEFAULT_CONFIG);
            Self::default()
        };

        config.config_path = config_path;
        config.cli = Some(cli);
        config.finalize(cli);
        config.validate()?;

        Ok(config)
    }

    /// Resolve the config file path. An explicit `--config` must exist.
    fn resolve_config_path(cli: &Cli, cwd: &Path) -> Result<(PathBuf, bool)> {
        match &cli.config {
            Some(path) => match find_config_file(cwd, path) {
                Some(found) => Ok((found, true)),
                None => Err(ConfigError::NotFound(path.clone()).into()),
            },
            None => match find_config_file(cwd, Path::new(DEFAULT_CONFIG)) {
                Some(found) => Ok((found, true)),
                None => Ok((cwd.join(DEFAULT_CONFIG), false)),
            },
        }
    }

    /// Finalize configuration after loading.
    fn finalize(&mut self, cli: &Cli) {
        let root = self
            .config_path
            .parent()
            .map(crate::utils::path::normalize_path)
            .unwrap_or_default();
        self.set_root(&root);
        self.config_path = crate::utils::path::normalize_path(&self.config_path);

        self.mode = Mode::resolve(cli.production);
        Self::update_option(&mut self.serve.port, cli.port.as_ref());
    }

    /// Load configuration from file path with unknown field detection.
    fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)?;
        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }

        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>)> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })
        .map_err(ConfigError::Toml)?;
        Ok((config, ignored))
    }

    /// Print warning about unknown fields.
    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warning"; "unknown fields in {}, ignoring:", display_path);
        for field in fields {
            eprintln!("- {}", field);
        }
    }

    /// Update config option if CLI value is provided.
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    // ========================================================================
    // paths
    // ========================================================================

    /// Get the root directory path
    pub fn get_root(&self) -> &Path {
        &self.root
    }

    /// Set the root directory path
    pub fn set_root(&mut self, path: &Path) {
        self.root = path.to_path_buf();
    }

    /// Join a path with the root directory.
    pub fn root_join(&self, path: impl AsRef<Path>) -> PathBuf {
        self.root.join(path)
    }

    /// Get path relative to the project root, for display
    pub fn root_relative(&self, path: impl AsRef<Path>) -> PathBuf {
        path.as_ref()
            .strip_prefix(&self.root)
            .map(Path::to_path_buf)
            .unwrap_or_else(|_| path.as_ref().to_path_buf())
    }

    pub fn dist_dir(&self) -> PathBuf {
        self.root_join(&self.paths.dist)
    }

    pub fn assets_dir(&self) -> PathBuf {
        self.root_join(&self.paths.assets)
    }

    pub fn styles_dir(&self) -> PathBuf {
        self.dist_dir().join(&self.styles.dir)
    }

    pub fn scripts_dir(&self) -> PathBuf {
        self.dist_dir().join(&self.scripts.dir)
    }

    pub fn images_dir(&self) -> PathBuf {
        self.dist_dir().join(&self.images.dir)
    }

    pub fn fonts_dir(&self) -> PathBuf {
        self.dist_dir().join(&self.fonts.dir)
    }

    /// Output subdirectories emptied by `clean`.
    pub fn output_dirs(&self) -> [PathBuf; 4] {
        [
            self.styles_dir(),
            self.fonts_dir(),
            self.images_dir(),
            self.scripts_dir(),
        ]
    }

    /// Expand `{vendor}`, `{assets}` and `{dist}` in an input pattern.
    ///
    /// The result stays relative to the project root.
    pub fn expand(&self, pattern: &str) -> String {
        expand_placeholders(
            pattern,
            &[
                ("vendor", &self.paths.vendor),
                ("assets", &self.paths.assets),
                ("dist", &self.paths.dist),
            ],
        )
    }

    /// Source pattern under `paths.assets` (the `[patterns]` entries).
    pub fn source_pattern(&self, pattern: &str) -> String {
        self.expand(&format!("{{assets}}/{pattern}"))
    }

    // ========================================================================
    // validation
    // ========================================================================

    /// Validate the whole configuration.
    ///
    /// Collects all validation errors and returns them at once.
    pub fn validate(&self) -> Result<()> {
        let mut diag = ConfigDiagnostics::new();

        self.paths.validate(self.get_root(), &mut diag);
        self.patterns.validate(&mut diag);
        self.styles.validate(&mut diag);
        self.scripts.validate(&mut diag);
        self.images.validate(&mut diag);
        self.fonts.validate(&mut diag);

        diag.print_warnings();

        diag.into_result()
            .map_err(|e| ConfigError::Diagnostics(e).into())
    }
}

// ============================================================================
// Test Helpers (available to all modules via `use crate::config::test_*`)
// ============================================================================

/// Parse config, panicking on unknown fields (to catch config typos in tests).
#[cfg(test)]
pub fn test_parse_config(content: &str) -> KilnConfig {
    let (parsed, ignored) = KilnConfig::parse_with_ignored(content).unwrap();
    assert!(
        ignored.is_empty(),
        "test config has unknown fields: {:?}",
        ignored
    );
    parsed
}

/// Parse config rooted at a scratch project directory.
///
/// Stylesheets are "compiled" with `cat` so tests don't need sass installed.
#[cfg(test)]
pub fn test_project_config(root: &Path, content: &str, production: bool) -> KilnConfig {
    let content = if content.contains("compiler") {
        content.to_string()
    } else {
        format!("[styles]\ncompiler = [\"cat\"]\n{content}")
    };
    let mut config = test_parse_config(&content);
    config.set_root(root);
    config.config_path = root.join(DEFAULT_CONFIG);
    config.mode = Mode::from_flag(production);
    config
}

// ============================================================================
// tests
// ============================================================================
