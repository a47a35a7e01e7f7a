//! Live reload script injection for served HTML.

use crate::embed::serve::script_tag;
use crate::utils::mime::is_html;

/// Inject the live reload script if content is HTML and a socket is up.
pub fn maybe_inject_livereload(body: Vec<u8>, content_type: &str, ws_port: Option<u16>) -> Vec<u8> {
    match ws_port {
        Some(_) if is_html(content_type) => inject_livereload_script(&body),
        _ => body,
    }
}

/// Inject script before the last `</body>`, or append if there is none.
fn inject_livereload_script(content: &[u8]) -> Vec<u8> {
    const PATTERN: &[u8] = b"</body>";

    let script = script_tag();
    let script = script.as_bytes();
    let pos = content
        .windows(PATTERN.len())
        .rposition(|w| w.eq_ignore_ascii_case(PATTERN))
        .unwrap_or(content.len());

    let mut result = Vec::with_capacity(content.len() + script.len());
    result.extend_from_slice(&content[..pos]);
    result.extend_from_slice(script);
    result.extend_from_slice(&content[pos..]);
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::mime::types::{CSS, HTML};

    #[test]
    fn test_inject_before_body_close() {
        let html = b"<html><body><p>hi</p></BODY></html>".to_vec();
        let out = String::from_utf8(maybe_inject_livereload(html, HTML, Some(35729))).unwrap();
        assert_eq!(
            out,
            format!("<html><body><p>hi</p>{}</BODY></html>", script_tag())
        );
    }

    #[test]
    fn test_inject_appends_without_body() {
        let out = maybe_inject_livereload(b"<p>hi</p>".to_vec(), HTML, Some(1));
        assert!(String::from_utf8(out).unwrap().ends_with(&script_tag()));
    }

    #[test]
    fn test_no_injection_for_css_or_without_socket() {
        let css = b"body{}".to_vec();
        assert_eq!(maybe_inject_livereload(css.clone(), CSS, Some(1)), css);

        let html = b"<body></body>".to_vec();
        assert_eq!(maybe_inject_livereload(html.clone(), HTML, None), html);
    }
}
