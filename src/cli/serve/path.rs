//! URL to filesystem path resolution.

use percent_encoding::percent_decode_str;
use std::path::{Path, PathBuf};

/// Resolve URL to a file under `serve_root`, handling index.html for directories.
pub fn resolve_path(url: &str, serve_root: &Path) -> Option<PathBuf> {
    let clean = normalize_url(url);

    if clean.split('/').any(|seg| seg == "..") {
        return None;
    }

    // Canonicalize so symlinks can't escape serve_root
    let canonical = serve_root.join(&clean).canonicalize().ok()?;
    let root_canonical = serve_root.canonicalize().ok()?;
    if !canonical.starts_with(&root_canonical) {
        return None;
    }

    if canonical.is_file() {
        return Some(canonical);
    }

    let index = canonical.join("index.html");
    index.is_file().then_some(index)
}

/// Drop the query string.
pub fn strip_query(url: &str) -> &str {
    url.split_once('?').map_or(url, |(path, _)| path)
}

/// Decode, strip query string, trim slashes.
fn normalize_url(url: &str) -> String {
    let path = strip_query(url);
    let decoded = percent_decode_str(path).decode_utf8_lossy();
    decoded.trim_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn dist() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("css")).unwrap();
        fs::create_dir_all(dir.path().join("docs")).unwrap();
        fs::write(dir.path().join("index.html"), "<html></html>").unwrap();
        fs::write(dir.path().join("css/main.min.css"), "a{}").unwrap();
        fs::write(dir.path().join("docs/index.html"), "docs").unwrap();
        fs::write(dir.path().join("my file.txt"), "x").unwrap();
        dir
    }

    #[test]
    fn test_resolve_file_and_index() {
        let dir = dist();
        let root = dir.path().canonicalize().unwrap();

        assert_eq!(
            resolve_path("/css/main.min.css?v=3", dir.path()),
            Some(root.join("css/main.min.css"))
        );
        assert_eq!(resolve_path("/", dir.path()), Some(root.join("index.html")));
        assert_eq!(
            resolve_path("/docs/", dir.path()),
            Some(root.join("docs/index.html"))
        );
        assert_eq!(
            resolve_path("/my%20file.txt", dir.path()),
            Some(root.join("my file.txt"))
        );
    }

    #[test]
    fn test_resolve_rejects_missing_and_traversal() {
        let dir = dist();
        assert_eq!(resolve_path("/nope.css", dir.path()), None);
        assert_eq!(resolve_path("/css/", dir.path()), None);
        assert_eq!(resolve_path("/../etc/passwd", dir.path()), None);
        assert_eq!(resolve_path("/css/%2e%2e/%2e%2e/secret", dir.path()), None);
    }

    #[test]
    fn test_strip_query() {
        assert_eq!(strip_query("/__kiln/livereload.js?t=1"), "/__kiln/livereload.js");
        assert_eq!(strip_query("/a.css"), "/a.css");
    }
}
