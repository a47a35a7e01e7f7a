//! Relative path helpers.

use std::path::{Component, Path};

/// Render a relative path with `/` separators.
///
/// Returns `None` for paths that climb out (`..`) or are absolute.
pub fn to_slash(path: &Path) -> Option<String> {
    let mut parts = Vec::new();
    for component in path.components() {
        match component {
            Component::Normal(part) => parts.push(part.to_string_lossy()),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
        }
    }
    Some(parts.join("/"))
}

/// URL path (`/css/app.css`) of a file under `base`.
pub fn url_path(base: &Path, file: &Path) -> Option<String> {
    let rel = file.strip_prefix(base).ok()?;
    to_slash(rel).map(|p| format!("/{p}"))
}

/// Slash path from directory `from` to `to`, climbing with `..` as needed.
///
/// Both paths should be absolute (or both relative to the same base).
pub fn relative(from: &Path, to: &Path) -> String {
    let from: Vec<_> = from.components().collect();
    let to: Vec<_> = to.components().collect();
    let common = from.iter().zip(&to).take_while(|(a, b)| a == b).count();

    let mut parts: Vec<String> = vec!["..".to_string(); from.len() - common];
    parts.extend(
        to[common..]
            .iter()
            .map(|c| c.as_os_str().to_string_lossy().into_owned()),
    );
    parts.join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_slash() {
        assert_eq!(to_slash(Path::new("css/app.css")).as_deref(), Some("css/app.css"));
        assert_eq!(to_slash(Path::new("./js/app.js")).as_deref(), Some("js/app.js"));
        assert_eq!(to_slash(Path::new("../secret")), None);
        assert_eq!(to_slash(Path::new("/etc/passwd")), None);
    }

    #[test]
    fn test_relative() {
        assert_eq!(
            relative(Path::new("/p/dist/css"), Path::new("/p/assets/scss/app.scss")),
            "../../assets/scss/app.scss"
        );
        assert_eq!(
            relative(Path::new("/p/dist/js"), Path::new("/p/dist/js/app.js")),
            "app.js"
        );
    }

    #[test]
    fn test_url_path() {
        assert_eq!(
            url_path(Path::new("/p/dist"), Path::new("/p/dist/css/app.css")).as_deref(),
            Some("/css/app.css")
        );
        assert_eq!(url_path(Path::new("/p/dist"), Path::new("/p/assets/a.css")), None);
    }
}
