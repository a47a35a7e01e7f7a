//! `[images]` and `[fonts]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [images]
//! dir = "img"
//! quality = 80        # JPEG quality, 1-100
//!
//! [fonts]
//! dir = "font"
//! inputs = ["{vendor}/font-awesome/fonts/*"]
//! ```

use crate::config::{ConfigDiagnostics, FieldPath};
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ImagesConfig {
    /// Output directory under `paths.dist`.
    pub dir: PathBuf,
    /// JPEG re-encoding quality.
    pub quality: u8,
}

impl Default for ImagesConfig {
    fn default() -> Self {
        Self {
            dir: "img".into(),
            quality: 80,
        }
    }
}

impl ImagesConfig {
    const DIR: FieldPath = FieldPath::new("images.dir");
    const QUALITY: FieldPath = FieldPath::new("images.quality");

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.dir.as_os_str().is_empty() {
            diag.error(Self::DIR, "path must not be empty");
        }
        if !(1..=100).contains(&self.quality) {
            diag.error(
                Self::QUALITY,
                format!("quality {} is out of range 1-100", self.quality),
            );
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FontsConfig {
    /// Output directory under `paths.dist`.
    pub dir: PathBuf,
    /// Font file patterns, copied as is.
    pub inputs: Vec<String>,
}

impl Default for FontsConfig {
    fn default() -> Self {
        Self {
            dir: "font".into(),
            inputs: vec!["{vendor}/font-awesome/fonts/*".into()],
        }
    }
}

impl FontsConfig {
    const DIR: FieldPath = FieldPath::new("fonts.dir");
    const INPUTS: FieldPath = FieldPath::new("fonts.inputs");

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.dir.as_os_str().is_empty() {
            diag.error(Self::DIR, "path must not be empty");
        }
        for input in &self.inputs {
            if let Err(e) = crate::glob::Pattern::new(input) {
                diag.error(Self::INPUTS, e.to_string());
            }
        }
    }
}
