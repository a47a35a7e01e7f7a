//! Script bundles.
//!
//! Inputs are concatenated verbatim, one newline between files. Production
//! output goes through the oxc minifier; development output keeps the
//! original text and gets a line map. Either way a syntax error fails the
//! bundle and names the input it came from.

use std::fs;
use std::path::PathBuf;

use super::sourcemap::{SourceMapBuilder, line_span};
use super::{IoContext, KilnError, MapComment, bundle_inputs, emit_bundle, map_source_name};
use crate::config::{BundleConfig, KilnConfig};
use crate::{debug, log};

/// Build one script bundle into `{dist}/{scripts.dir}/{output}`.
pub fn compile_script(
    config: &KilnConfig,
    bundle: &BundleConfig,
) -> Result<Vec<PathBuf>, KilnError> {
    let inputs = bundle_inputs(config, bundle)?;
    if inputs.is_empty() {
        log!("warning"; "scripts: no inputs matched for `{}`, skipping", bundle.output);
        return Ok(Vec::new());
    }

    let out_dir = config.scripts_dir();
    let out_path = out_dir.join(&bundle.output);

    let mut map = config
        .mode
        .source_maps
        .then(|| SourceMapBuilder::new(&bundle.output));
    let mut parts = Vec::with_capacity(inputs.len());

    for input in &inputs {
        debug!("scripts"; "{}", config.root_relative(input).display());
        let content = fs::read_to_string(input).at(input)?;
        if let Some(map) = map.as_mut() {
            let source = map.add_source(map_source_name(&out_dir, input), Some(content.clone()));
            map.map_lines(source, line_span(&content));
        }
        parts.push(content);
    }

    if !config.mode.production {
        if let Some(err) = locate_script_error(config, &inputs, &parts) {
            return Err(err);
        }
    }

    let mut code = parts.join("\n");
    if config.mode.production {
        code = super::minify::minify_js(&code).map_err(|message| {
            locate_script_error(config, &inputs, &parts).unwrap_or_else(|| KilnError::Script {
                path: config.root_relative(&out_path),
                message,
            })
        })?;
    }

    emit_bundle(&out_path, code, map, MapComment::Js)
}

/// Point a bundle parse failure at the input file that caused it.
fn locate_script_error(
    config: &KilnConfig,
    inputs: &[PathBuf],
    parts: &[String],
) -> Option<KilnError> {
    inputs.iter().zip(parts).find_map(|(input, content)| {
        super::minify::check_js(content)
            .err()
            .map(|message| KilnError::Script {
                path: config.root_relative(input),
                message,
            })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_project_config;
    use std::path::Path;
    use tempfile::TempDir;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn default_project(dir: &Path) {
        write(
            dir,
            "node_modules/bootstrap/dist/js/bootstrap.js",
            "var Bootstrap = {\n  version: '3'\n};\n",
        );
        write(dir, "node_modules/holderjs/holder.js", "var Holder = {};");
        write(
            dir,
            "assets/js/app.js",
            "// application entry\nfunction start() {\n  return Holder;\n}\n",
        );
    }

    #[test]
    fn test_bundles_are_disjoint() {
        let dir = TempDir::new().unwrap();
        default_project(dir.path());
        let config = test_project_config(dir.path(), "", false);

        for bundle in &config.scripts.bundle {
            compile_script(&config, bundle).unwrap();
        }

        let vendor = fs::read_to_string(dir.path().join("dist/js/vendor.js")).unwrap();
        let app = fs::read_to_string(dir.path().join("dist/js/app.js")).unwrap();

        assert!(vendor.starts_with("var Bootstrap = {\n  version: '3'\n};\n\nvar Holder = {};"));
        assert!(!vendor.contains("start"));
        assert!(app.contains("function start()"));
        assert!(!app.contains("Bootstrap"));
        assert!(app.ends_with("//# sourceMappingURL=app.js.map\n"));
    }

    #[test]
    fn test_development_map_lines() {
        let dir = TempDir::new().unwrap();
        default_project(dir.path());
        let config = test_project_config(dir.path(), "", false);

        compile_script(&config, &config.scripts.bundle[0]).unwrap();
        let map: serde_json::Value = serde_json::from_str(
            &fs::read_to_string(dir.path().join("dist/js/vendor.js.map")).unwrap(),
        )
        .unwrap();

        assert_eq!(map["file"], "vendor.js");
        assert_eq!(
            map["sources"],
            serde_json::json!([
                "../../node_modules/bootstrap/dist/js/bootstrap.js",
                "../../node_modules/holderjs/holder.js"
            ])
        );
        // bootstrap.js spans 4 lines (trailing newline + separator), holder.js 1
        assert_eq!(map["mappings"], "AAAA;AACA;AACA;AACA;ACHA");
    }

    #[test]
    fn test_production_minifies_without_map() {
        let dir = TempDir::new().unwrap();
        default_project(dir.path());
        write(dir.path(), "dist/js/app.js.map", "{}");
        let config = test_project_config(dir.path(), "", true);

        let written = compile_script(&config, &config.scripts.bundle[1]).unwrap();
        assert_eq!(written, vec![dir.path().join("dist/js/app.js")]);

        let app = fs::read_to_string(dir.path().join("dist/js/app.js")).unwrap();
        assert!(!app.contains("application entry"));
        assert!(!app.contains("sourceMappingURL"));
        assert!(app.contains("start"));
        assert!(!dir.path().join("dist/js/app.js.map").exists());
    }

    #[test]
    fn test_parse_error_names_the_input() {
        let dir = TempDir::new().unwrap();
        default_project(dir.path());
        write(dir.path(), "node_modules/holderjs/holder.js", "var Holder = {;");
        let config = test_project_config(dir.path(), "", true);

        let err = compile_script(&config, &config.scripts.bundle[0]).unwrap_err();
        let KilnError::Script { path, .. } = err else {
            panic!("expected script error, got {err}");
        };
        assert_eq!(path, PathBuf::from("node_modules/holderjs/holder.js"));
    }

    #[test]
    fn test_development_parse_error_writes_nothing() {
        let dir = TempDir::new().unwrap();
        default_project(dir.path());
        write(dir.path(), "assets/js/app.js", "function start( {\n");
        let config = test_project_config(dir.path(), "", false);

        let err = compile_script(&config, &config.scripts.bundle[1]).unwrap_err();
        let KilnError::Script { path, .. } = err else {
            panic!("expected script error, got {err}");
        };
        assert_eq!(path, PathBuf::from("assets/js/app.js"));
        assert!(!dir.path().join("dist/js/app.js").exists());
    }
}
