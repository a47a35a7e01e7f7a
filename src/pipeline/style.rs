//! Stylesheet bundles.
//!
//! ```text
//! inputs ──> .scss/.sass: external compiler (stdout)  ──> lightningcss ──> concat ──> css/<output>
//!            .css:        read as is                      prefix, print          (+ .map in dev)
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use lightningcss::targets::Targets;

use super::sourcemap::{SourceMapBuilder, line_span};
use super::{IoContext, KilnError, MapComment, bundle_inputs, emit_bundle, map_source_name};
use crate::config::{BundleConfig, KilnConfig};
use crate::utils::exec::Cmd;
use crate::{debug, log};

/// Compiler chatter that isn't worth echoing on every rebuild.
const COMPILER_NOISE: &[&str] = &["More info", "Recommendation:"];

/// Build one style bundle into `{dist}/{styles.dir}/{output}`.
///
/// Returns the written files (bundle, plus its map in development).
pub fn compile_style(config: &KilnConfig, bundle: &BundleConfig) -> Result<Vec<PathBuf>, KilnError> {
    let inputs: Vec<PathBuf> = bundle_inputs(config, bundle)?
        .into_iter()
        .filter(|path| !is_partial(path))
        .collect();

    if inputs.is_empty() {
        log!("warning"; "styles: no inputs matched for `{}`, skipping", bundle.output);
        return Ok(Vec::new());
    }

    let out_dir = config.styles_dir();
    let out_path = out_dir.join(&bundle.output);
    let targets = Targets::from(config.styles.targets.browsers());
    let minify = config.mode.production;

    let mut map = config
        .mode
        .source_maps
        .then(|| SourceMapBuilder::new(&bundle.output));
    let mut parts = Vec::with_capacity(inputs.len());

    for input in &inputs {
        let display = config.root_relative(input);
        debug!("styles"; "{}", display.display());

        let css = load_css(config, input)?;
        let css = super::minify::process_css(&css, &display.to_string_lossy(), targets, minify)
            .map_err(|message| KilnError::Style {
                path: display.clone(),
                message,
            })?;
        let css = css.trim_end().to_string();

        if let Some(map) = map.as_mut() {
            let original = fs::read_to_string(input).ok();
            let source = map.add_source(map_source_name(&out_dir, input), original);
            map.map_block(source, 0, line_span(&css));
        }
        parts.push(css);
    }

    emit_bundle(&out_path, parts.join("\n"), map, MapComment::Css)
}

/// CSS text of one input: compiled for `.scss`/`.sass`, read otherwise.
fn load_css(config: &KilnConfig, input: &Path) -> Result<String, KilnError> {
    if !needs_compiler(input) {
        return fs::read_to_string(input).at(input);
    }

    let output = Cmd::from_slice(&config.styles.compiler)
        .arg(input)
        .cwd(config.get_root())
        .quiet(COMPILER_NOISE)
        .run()
        .map_err(|e| KilnError::Compile {
            path: config.root_relative(input),
            message: e.to_string(),
        })?;

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

fn needs_compiler(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("scss" | "sass")
    )
}

/// Sass partials (`_name.scss`) are only ever imported, never compiled alone.
fn is_partial(path: &Path) -> bool {
    needs_compiler(path)
        && path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.starts_with('_'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_project_config;
    use tempfile::TempDir;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    const APP_SCSS: &str = ".nav {\n  display: flex;\n}\n\n.btn {\n  color: red;\n}\n";

    #[test]
    fn test_development_bundle_has_map() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "assets/scss/app.scss", APP_SCSS);
        let config = test_project_config(dir.path(), "", false);

        let written = compile_style(&config, &config.styles.bundle[0]).unwrap();
        let css_path = dir.path().join("dist/css/app.css");
        let map_path = dir.path().join("dist/css/app.css.map");
        assert_eq!(written, vec![css_path.clone(), map_path.clone()]);

        let css = fs::read_to_string(&css_path).unwrap();
        assert!(css.contains(".nav {"));
        assert!(css.ends_with("/*# sourceMappingURL=app.css.map */\n"));

        let map: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&map_path).unwrap()).unwrap();
        assert_eq!(map["sources"][0], "../../assets/scss/app.scss");
        assert_eq!(map["sourcesContent"][0], APP_SCSS);
    }

    #[test]
    fn test_production_bundle_is_minified_without_map() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "assets/scss/app.scss", APP_SCSS);
        write(dir.path(), "dist/css/app.css.map", "{}");
        let config = test_project_config(dir.path(), "", true);

        let written = compile_style(&config, &config.styles.bundle[0]).unwrap();
        assert_eq!(written.len(), 1);

        let css = fs::read_to_string(dir.path().join("dist/css/app.css")).unwrap();
        assert!(!css.contains('\n'));
        assert!(!css.contains("sourceMappingURL"));
        assert!(css.contains(".nav{display:flex}"));
        assert!(!dir.path().join("dist/css/app.css.map").exists());
    }

    #[test]
    fn test_concatenates_inputs_in_order() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "node_modules/reset/reset.css", "html { margin: 0; }\n");
        write(dir.path(), "assets/scss/app.scss", ".z { color: blue; }\n");
        write(dir.path(), "assets/scss/_vars.scss", ".never { color: red; }\n");
        let config = test_project_config(
            dir.path(),
            r#"
[[styles.bundle]]
output = "site.css"
inputs = ["{vendor}/reset/reset.css", "{assets}/scss/*.scss"]
"#,
            true,
        );

        compile_style(&config, &config.styles.bundle[0]).unwrap();
        let css = fs::read_to_string(dir.path().join("dist/css/site.css")).unwrap();
        let reset = css.find("html{margin:0}").unwrap();
        let app = css.find(".z{color:#00f}").unwrap();
        assert!(reset < app);
        assert!(!css.contains(".never"));
    }

    #[test]
    fn test_compiler_failure() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "assets/scss/app.scss", APP_SCSS);
        let config = test_project_config(
            dir.path(),
            "[styles]\ncompiler = [\"sh\", \"-c\", \"echo 'Error: undefined variable' >&2; exit 65\", \"sass\"]",
            false,
        );

        let err = compile_style(&config, &config.styles.bundle[0]).unwrap_err();
        let KilnError::Compile { path, message } = err else {
            panic!("expected compile error, got {err}");
        };
        assert_eq!(path, PathBuf::from("assets/scss/app.scss"));
        assert!(message.contains("undefined variable"));
        assert!(!dir.path().join("dist/css/app.css").exists());
    }

    #[test]
    fn test_missing_literal_input() {
        let dir = TempDir::new().unwrap();
        let config = test_project_config(dir.path(), "", false);
        let err = compile_style(&config, &config.styles.bundle[0]).unwrap_err();
        assert!(matches!(err, KilnError::InputMissing(_)));
    }

    #[test]
    fn test_is_partial() {
        assert!(is_partial(Path::new("scss/_vars.scss")));
        assert!(!is_partial(Path::new("scss/app.scss")));
        assert!(!is_partial(Path::new("css/_legacy.css")));
    }
}
