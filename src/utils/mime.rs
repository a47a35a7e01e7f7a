//! Content types for files served from the dist tree.

use std::path::Path;

pub mod types {
    pub const HTML: &str = "text/html; charset=utf-8";
    pub const PLAIN: &str = "text/plain; charset=utf-8";
    pub const CSS: &str = "text/css; charset=utf-8";
    pub const JAVASCRIPT: &str = "text/javascript; charset=utf-8";
    /// Also used for `.map` files
    pub const JSON: &str = "application/json";
    pub const OCTET_STREAM: &str = "application/octet-stream";
}

/// Content type by extension (case-insensitive); unknown → octet-stream.
pub fn from_path(path: &Path) -> &'static str {
    use types::*;

    let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
        return OCTET_STREAM;
    };
    match ext.to_ascii_lowercase().as_str() {
        "html" | "htm" => HTML,
        "css" => CSS,
        "js" | "mjs" => JAVASCRIPT,
        "json" | "map" => JSON,
        "txt" => PLAIN,
        // img/
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "ico" => "image/x-icon",
        // font/
        "woff" => "font/woff",
        "woff2" => "font/woff2",
        "ttf" => "font/ttf",
        "otf" => "font/otf",
        "eot" => "application/vnd.ms-fontobject",
        // media referenced from pages, served with Range support
        "mp4" => "video/mp4",
        "webm" => "video/webm",
        _ => OCTET_STREAM,
    }
}

pub fn is_html(content_type: &str) -> bool {
    content_type.starts_with("text/html")
}

#[cfg(test)]
mod tests {
    use super::types::*;
    use super::*;

    #[test]
    fn test_dist_outputs() {
        assert_eq!(from_path(Path::new("index.html")), HTML);
        assert_eq!(from_path(Path::new("css/app.css")), CSS);
        assert_eq!(from_path(Path::new("js/vendor.js")), JAVASCRIPT);
        assert_eq!(from_path(Path::new("js/app.js.map")), JSON);
        assert_eq!(from_path(Path::new("img/logo.PNG")), "image/png");
        assert_eq!(from_path(Path::new("font/fontawesome-webfont.woff2")), "font/woff2");
        assert_eq!(
            from_path(Path::new("font/fontawesome-webfont.eot")),
            "application/vnd.ms-fontobject"
        );
    }

    #[test]
    fn test_unknown_is_octet_stream() {
        assert_eq!(from_path(Path::new("data.xyz")), OCTET_STREAM);
        assert_eq!(from_path(Path::new("LICENSE")), OCTET_STREAM);
    }

    #[test]
    fn test_is_html() {
        assert!(is_html(HTML));
        assert!(!is_html(CSS));
    }
}
