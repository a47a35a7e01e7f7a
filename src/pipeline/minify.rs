//! Minification and vendor prefixing.
//!
//! Uses oxc for JavaScript and lightningcss for CSS.

use lightningcss::stylesheet::{MinifyOptions, ParserOptions, PrinterOptions, StyleSheet};
use lightningcss::targets::Targets;
use oxc::allocator::Allocator;
use oxc::codegen::{Codegen, CodegenOptions, CommentOptions};
use oxc::mangler::MangleOptions;
use oxc::minifier::{CompressOptions, Minifier, MinifierOptions};
use oxc::parser::Parser;
use oxc::span::SourceType;

/// Classic scripts: concatenated bundles share one global scope.
fn script_type() -> SourceType {
    SourceType::default().with_script(true)
}

/// Check that `source` parses, returning the parser's messages otherwise.
pub fn check_js(source: &str) -> Result<(), String> {
    let allocator = Allocator::default();
    let ret = Parser::new(&allocator, source, script_type()).parse();
    if ret.errors.is_empty() {
        Ok(())
    } else {
        Err(join_errors(&ret.errors))
    }
}

/// Minify JavaScript source code.
///
/// Top-level names stay untouched so separate bundles can still reach
/// each other's globals.
pub fn minify_js(source: &str) -> Result<String, String> {
    let allocator = Allocator::default();
    let ret = Parser::new(&allocator, source, script_type()).parse();
    if !ret.errors.is_empty() {
        return Err(join_errors(&ret.errors));
    }
    let mut program = ret.program;
    let options = MinifierOptions {
        mangle: Some(MangleOptions::default()),
        compress: Some(CompressOptions::smallest()),
    };
    let ret = Minifier::new(options).minify(&allocator, &mut program);
    let code = Codegen::new()
        .with_options(CodegenOptions {
            minify: true,
            comments: CommentOptions::disabled(),
            ..CodegenOptions::default()
        })
        .with_scoping(ret.scoping)
        .build(&program)
        .code;
    Ok(code)
}

fn join_errors<E: ToString>(errors: &[E]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Parse CSS, add vendor prefixes for `targets`, and print it.
///
/// `minify` selects compact output; prefixing happens either way.
pub fn process_css(
    source: &str,
    filename: &str,
    targets: Targets,
    minify: bool,
) -> Result<String, String> {
    let mut stylesheet = StyleSheet::parse(
        source,
        ParserOptions {
            filename: filename.to_string(),
            ..ParserOptions::default()
        },
    )
    .map_err(|e| e.to_string())?;

    stylesheet
        .minify(MinifyOptions {
            targets,
            ..MinifyOptions::default()
        })
        .map_err(|e| e.to_string())?;

    let result = stylesheet
        .to_css(PrinterOptions {
            minify,
            targets,
            ..PrinterOptions::default()
        })
        .map_err(|e| e.to_string())?;
    Ok(result.code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lightningcss::targets::Browsers;

    fn old_safari() -> Targets {
        Targets::from(Browsers {
            safari: Some(8 << 16),
            ..Browsers::default()
        })
    }

    #[test]
    fn test_minify_js_strips_comments_and_whitespace() {
        let source = "// greeting\nfunction greet(name) {\n  var message = 'hi ' + name;\n  return message;\n}\n";
        let minified = minify_js(source).unwrap();
        assert!(!minified.contains("greeting"));
        assert!(minified.contains("greet"));
        assert!(minified.len() < source.len());
    }

    #[test]
    fn test_minify_js_keeps_top_level_names() {
        let minified = minify_js("var Holder = {}; function initApp() { return Holder; }").unwrap();
        assert!(minified.contains("Holder"));
        assert!(minified.contains("initApp"));
    }

    #[test]
    fn test_minify_js_reports_parse_errors() {
        assert!(minify_js("function (").is_err());
        assert!(check_js("function (").is_err());
        assert!(check_js("var ok = 1;").is_ok());
    }

    #[test]
    fn test_process_css_prefixes() {
        let css = process_css(".a { user-select: none; }", "a.css", old_safari(), false).unwrap();
        assert!(css.contains("-webkit-user-select"));
    }

    #[test]
    fn test_process_css_minify() {
        let source = ".a {\n  color: red;\n}\n\n.b {\n  color: blue;\n}\n";
        let expanded = process_css(source, "a.css", Targets::default(), false).unwrap();
        let minified = process_css(source, "a.css", Targets::default(), true).unwrap();
        assert!(expanded.contains('\n'));
        assert!(!minified.trim_end().contains('\n'));
        assert!(minified.len() < expanded.len());
    }

    #[test]
    fn test_process_css_error() {
        let err = process_css("..broken { color: red; }", "bad.css", Targets::default(), false);
        assert!(err.is_err());
    }
}
