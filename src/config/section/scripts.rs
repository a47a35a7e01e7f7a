//! `[scripts]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [scripts]
//! dir = "js"
//!
//! [[scripts.bundle]]
//! output = "app.js"
//! inputs = ["{assets}/js/app.js"]
//! ```

use super::BundleConfig;
use super::bundle::validate_bundles;
use crate::config::{ConfigDiagnostics, FieldPath};
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScriptsConfig {
    /// Output directory under `paths.dist`.
    pub dir: PathBuf,
    /// Script bundles, each concatenated independently.
    pub bundle: Vec<BundleConfig>,
}

impl Default for ScriptsConfig {
    fn default() -> Self {
        Self {
            dir: "js".into(),
            bundle: vec![
                BundleConfig::new(
                    "vendor.js",
                    &[
                        "{vendor}/bootstrap/dist/js/bootstrap.js",
                        "{vendor}/holderjs/holder.js",
                    ],
                ),
                BundleConfig::new("app.js", &["{assets}/js/app.js"]),
            ],
        }
    }
}

impl ScriptsConfig {
    const DIR: FieldPath = FieldPath::new("scripts.dir");
    const BUNDLE: FieldPath = FieldPath::new("scripts.bundle");

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.dir.as_os_str().is_empty() {
            diag.error(Self::DIR, "path must not be empty");
        }
        validate_bundles(Self::BUNDLE, &self.bundle, diag);
    }
}
