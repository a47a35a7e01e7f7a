//! Bundle definitions shared by `[styles]` and `[scripts]`.
//!
//! # Example
//!
//! ```toml
//! [[scripts.bundle]]
//! output = "vendor.js"
//! inputs = [
//!     "{vendor}/bootstrap/dist/js/bootstrap.js",
//!     "{vendor}/holderjs/holder.js",
//! ]
//! ```

use crate::config::{ConfigDiagnostics, FieldPath};
use rustc_hash::FxHashSet;
use serde::Deserialize;

/// One output file built from an ordered list of input patterns.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BundleConfig {
    /// Output file name, written under the task's output directory.
    pub output: String,
    /// Input patterns, concatenated in list order.
    pub inputs: Vec<String>,
}

impl BundleConfig {
    pub fn new(output: &str, inputs: &[&str]) -> Self {
        Self {
            output: output.to_string(),
            inputs: inputs.iter().map(|s| (*s).to_string()).collect(),
        }
    }

    /// Whether any input pattern names a file the stylesheet compiler handles.
    pub fn needs_compiler(&self) -> bool {
        self.inputs
            .iter()
            .any(|input| input.contains(".scss") || input.contains(".sass"))
    }
}

/// Validate a bundle list.
///
/// # Checks
/// - output names are non-empty plain file names
/// - output names are unique within the list
/// - every bundle has at least one input
pub fn validate_bundles(field: FieldPath, bundles: &[BundleConfig], diag: &mut ConfigDiagnostics) {
    let mut seen = FxHashSet::default();

    for bundle in bundles {
        let output = bundle.output.trim();
        if output.is_empty() {
            diag.error(field, "bundle output name must not be empty");
            continue;
        }
        if !is_plain_file_name(output) {
            diag.error_with_hint(
                field,
                format!("bundle output `{output}` is not a plain file name"),
                "outputs are written into the task directory, drop the path",
            );
        }
        if !seen.insert(output) {
            diag.error(field, format!("duplicate bundle output `{output}`"));
        }
        if bundle.inputs.is_empty() {
            diag.error(field, format!("bundle `{output}` has no inputs"));
        }
        for input in &bundle.inputs {
            if let Err(e) = crate::glob::Pattern::new(input) {
                diag.error(field, format!("bundle `{output}`: {e}"));
            }
        }
    }
}

fn is_plain_file_name(name: &str) -> bool {
    !name.contains(['/', '\\']) && name != "." && name != ".."
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIELD: FieldPath = FieldPath::new("scripts.bundle");

    #[test]
    fn test_valid_bundles() {
        let bundles = vec![
            BundleConfig::new("vendor.js", &["{vendor}/a.js", "{vendor}/b.js"]),
            BundleConfig::new("app.js", &["{assets}/js/app.js"]),
        ];
        let mut diag = ConfigDiagnostics::new();
        validate_bundles(FIELD, &bundles, &mut diag);
        assert!(diag.is_empty());
    }

    #[test]
    fn test_invalid_bundles() {
        let bundles = vec![
            BundleConfig::new("", &["a.js"]),
            BundleConfig::new("js/app.js", &["a.js"]),
            BundleConfig::new("app.js", &[]),
            BundleConfig::new("app.js", &["b.js"]),
        ];
        let mut diag = ConfigDiagnostics::new();
        validate_bundles(FIELD, &bundles, &mut diag);

        let messages: Vec<_> = diag.errors().iter().map(|e| e.message.as_str()).collect();
        assert_eq!(messages.len(), 4);
        assert!(messages[0].contains("must not be empty"));
        assert!(messages[1].contains("not a plain file name"));
        assert!(messages[2].contains("no inputs"));
        assert!(messages[3].contains("duplicate"));
    }

    #[test]
    fn test_needs_compiler() {
        assert!(BundleConfig::new("app.css", &["{assets}/scss/app.scss"]).needs_compiler());
        assert!(BundleConfig::new("app.css", &["x.sass"]).needs_compiler());
        assert!(!BundleConfig::new("app.css", &["{vendor}/normalize.css"]).needs_compiler());
    }
}
