//! `[styles]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [styles]
//! dir = "css"                            # Under paths.dist
//! compiler = ["sass", "--no-source-map"] # Input file is appended, CSS read from stdout
//!
//! [styles.targets]                       # Vendor prefixes down to these versions
//! chrome = "95"
//! safari = "13.1"
//! firefox = "none"                       # Drop a browser from the default floor
//!
//! [[styles.bundle]]
//! output = "app.css"
//! inputs = ["{assets}/scss/app.scss"]
//! ```

use super::BundleConfig;
use super::bundle::validate_bundles;
use crate::config::{ConfigDiagnostics, FieldPath};
use lightningcss::targets::Browsers;
use serde::Deserialize;
use std::path::PathBuf;

/// Package runners resolve their tool at runtime, so `which` can't vouch for it.
const PACKAGE_RUNNERS: &[&str] = &["npx", "bunx", "pnpx", "yarn", "dlx"];

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StylesConfig {
    /// Output directory under `paths.dist`.
    pub dir: PathBuf,
    /// Stylesheet compiler command for `.scss`/`.sass` inputs.
    pub compiler: Vec<String>,
    /// Oldest browser versions to prefix for.
    pub targets: BrowserTargets,
    /// Style bundles.
    pub bundle: Vec<BundleConfig>,
}

pub struct StylesFields {
    pub dir: FieldPath,
    pub compiler: FieldPath,
    pub targets: FieldPath,
    pub bundle: FieldPath,
}

impl Default for StylesConfig {
    fn default() -> Self {
        Self {
            dir: "css".into(),
            compiler: vec!["sass".into(), "--no-source-map".into()],
            targets: BrowserTargets::default(),
            bundle: vec![BundleConfig::new("app.css", &["{assets}/scss/app.scss"])],
        }
    }
}

impl StylesConfig {
    pub const FIELDS: StylesFields = StylesFields {
        dir: FieldPath::new("styles.dir"),
        compiler: FieldPath::new("styles.compiler"),
        targets: FieldPath::new("styles.targets"),
        bundle: FieldPath::new("styles.bundle"),
    };

    /// Validate styles configuration.
    ///
    /// # Checks
    /// - `dir` is non-empty
    /// - bundles are well formed
    /// - target versions parse
    /// - if any bundle needs the compiler:
    ///   - `compiler` must not be empty
    ///   - `compiler[0]` should be installed (hint only, fails at run time)
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        let fields = Self::FIELDS;

        if self.dir.as_os_str().is_empty() {
            diag.error(fields.dir, "path must not be empty");
        }
        validate_bundles(fields.bundle, &self.bundle, diag);
        self.targets.validate(fields.targets, diag);

        if !self.bundle.iter().any(BundleConfig::needs_compiler) {
            return;
        }

        let Some(cmd) = self.compiler.first() else {
            diag.error_with_hint(
                fields.compiler,
                format!("{} is empty but stylesheet sources are configured", fields.compiler),
                "set it to [\"sass\", \"--no-source-map\"]",
            );
            return;
        };

        if which::which(cmd).is_err() {
            if PACKAGE_RUNNERS.contains(&cmd.as_str()) {
                if let Some(package) = self.compiler.get(1) {
                    diag.hint(
                        fields.compiler,
                        format!("`{package}` via `{cmd}`, ensure the package is installed"),
                    );
                }
            } else {
                diag.hint(
                    fields.compiler,
                    format!("`{cmd}` not found, stylesheet bundles will fail to compile"),
                );
            }
        }
    }
}

/// Browser floor for vendor prefixing, as `"major"` or `"major.minor"` strings.
///
/// Keys left out keep their default; `"none"` removes the browser.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BrowserTargets {
    pub android: Option<String>,
    pub chrome: Option<String>,
    pub edge: Option<String>,
    pub firefox: Option<String>,
    pub ie: Option<String>,
    pub ios_saf: Option<String>,
    pub opera: Option<String>,
    pub safari: Option<String>,
    pub samsung: Option<String>,
}

impl Default for BrowserTargets {
    fn default() -> Self {
        Self {
            android: None,
            chrome: Some("95".into()),
            edge: Some("95".into()),
            firefox: Some("90".into()),
            ie: None,
            ios_saf: Some("13".into()),
            opera: None,
            safari: Some("13".into()),
            samsung: None,
        }
    }
}

impl BrowserTargets {
    fn entries(&self) -> [(&'static str, &Option<String>); 9] {
        [
            ("android", &self.android),
            ("chrome", &self.chrome),
            ("edge", &self.edge),
            ("firefox", &self.firefox),
            ("ie", &self.ie),
            ("ios_saf", &self.ios_saf),
            ("opera", &self.opera),
            ("safari", &self.safari),
            ("samsung", &self.samsung),
        ]
    }

    fn validate(&self, field: FieldPath, diag: &mut ConfigDiagnostics) {
        for (name, version) in self.entries() {
            if let Some(version) = version
                && !is_excluded(version)
                && parse_version(version).is_none()
            {
                diag.error(
                    field,
                    format!(
                        "invalid version `{version}` for `{name}`, \
                         expected \"major[.minor]\" or \"none\""
                    ),
                );
            }
        }
    }

    /// Convert to lightningcss targets. Excluded and unparseable versions are skipped.
    pub fn browsers(&self) -> Browsers {
        let version = |v: &Option<String>| v.as_deref().and_then(parse_version);
        Browsers {
            android: version(&self.android),
            chrome: version(&self.chrome),
            edge: version(&self.edge),
            firefox: version(&self.firefox),
            ie: version(&self.ie),
            ios_saf: version(&self.ios_saf),
            opera: version(&self.opera),
            safari: version(&self.safari),
            samsung: version(&self.samsung),
        }
    }
}

fn is_excluded(version: &str) -> bool {
    version.trim().eq_ignore_ascii_case("none")
}

/// Encode `"major[.minor[.patch]]"` the way lightningcss expects: `major << 16 | minor << 8 | patch`.
fn parse_version(version: &str) -> Option<u32> {
    let mut parts = version.trim().split('.');
    let major: u32 = parts.next()?.parse().ok()?;
    let minor: u32 = parts.next().map_or(Some(0), |p| p.parse().ok())?;
    let patch: u32 = parts.next().map_or(Some(0), |p| p.parse().ok())?;
    if parts.next().is_some() || major > 0xff || minor > 0xff || patch > 0xff {
        return None;
    }
    Some((major << 16) | (minor << 8) | patch)
}
