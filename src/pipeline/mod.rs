//! Asset pipelines.
//!
//! Each pipeline is a linear chain: expand inputs → transform → write.
//!
//! | Module      | Chain                                                  |
//! |-------------|--------------------------------------------------------|
//! | `style`     | compiler (scss) → lightningcss prefix/print → concat   |
//! | `script`    | concat → oxc minify (production)                       |
//! | `image`     | decode → re-encode (jpeg quality / png best) → smaller |
//! | `copy`      | byte copy keeping paths relative to the pattern base   |
//! | `sourcemap` | line-granular v3 maps for style and script bundles     |

pub mod copy;
mod error;
pub mod image;
mod minify;
pub mod script;
pub mod sourcemap;
pub mod style;

pub use error::{IoContext, KilnError};

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::{BundleConfig, KilnConfig};
use crate::freshness::write_if_changed;
use sourcemap::SourceMapBuilder;

/// How a bundle references its source map.
#[derive(Debug, Clone, Copy)]
enum MapComment {
    Css,
    Js,
}

impl MapComment {
    fn render(self, map_name: &str) -> String {
        match self {
            Self::Css => format!("\n/*# sourceMappingURL={map_name} */\n"),
            Self::Js => format!("\n//# sourceMappingURL={map_name}\n"),
        }
    }
}

/// Expand a bundle's input patterns into files, in bundle order.
fn bundle_inputs(config: &KilnConfig, bundle: &BundleConfig) -> Result<Vec<PathBuf>, KilnError> {
    let patterns: Vec<String> = bundle.inputs.iter().map(|p| config.expand(p)).collect();
    crate::glob::expand_all(config.get_root(), &patterns)
}

/// Source name recorded in a map: the input relative to the map's directory.
fn map_source_name(out_dir: &Path, input: &Path) -> String {
    crate::utils::path::relative(out_dir, input)
}

/// Write a bundle and, when a map is given, its `.map` sibling.
///
/// Without a map any stale `.map` from an earlier development build is
/// removed. Returns the paths of the files the bundle now consists of.
fn emit_bundle(
    out_path: &Path,
    mut code: String,
    map: Option<SourceMapBuilder>,
    comment: MapComment,
) -> Result<Vec<PathBuf>, KilnError> {
    let file_name = out_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let map_path = out_path.with_file_name(format!("{file_name}.map"));

    let Some(map) = map else {
        write_if_changed(out_path, code.as_bytes()).at(out_path)?;
        if map_path.is_file() {
            fs::remove_file(&map_path).at(&map_path)?;
        }
        return Ok(vec![out_path.to_path_buf()]);
    };

    let json = map.build().to_json().map_err(|e| {
        KilnError::io(&map_path, std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    })?;
    let map_name = format!("{file_name}.map");
    code.push_str(&comment.render(&map_name));

    write_if_changed(out_path, code.as_bytes()).at(out_path)?;
    write_if_changed(&map_path, json.as_bytes()).at(&map_path)?;
    Ok(vec![out_path.to_path_buf(), map_path])
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_emit_with_and_without_map() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("js/app.js");

        let mut builder = SourceMapBuilder::new("app.js");
        let s = builder.add_source("../a.js", None);
        builder.map_lines(s, 1);
        let written = emit_bundle(&out, "x();".into(), Some(builder), MapComment::Js).unwrap();
        assert_eq!(written.len(), 2);
        let code = fs::read_to_string(&out).unwrap();
        assert_eq!(code, "x();\n//# sourceMappingURL=app.js.map\n");
        assert!(dir.path().join("js/app.js.map").is_file());

        let written = emit_bundle(&out, "x()".into(), None, MapComment::Js).unwrap();
        assert_eq!(written, vec![out.clone()]);
        assert_eq!(fs::read_to_string(&out).unwrap(), "x()");
        assert!(!dir.path().join("js/app.js.map").exists());
    }

    #[test]
    fn test_css_map_comment() {
        assert_eq!(
            MapComment::Css.render("app.css.map"),
            "\n/*# sourceMappingURL=app.css.map */\n"
        );
    }
}
