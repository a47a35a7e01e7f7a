//! Domain errors raised while building bundles and copying assets.

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum KilnError {
    /// A literal input path does not exist.
    #[error("input `{0}` does not exist")]
    InputMissing(PathBuf),

    /// The external stylesheet compiler failed.
    #[error("failed to compile `{path}`\n{message}")]
    Compile { path: PathBuf, message: String },

    /// lightningcss could not parse or print a stylesheet.
    #[error("invalid stylesheet `{path}`: {message}")]
    Style { path: PathBuf, message: String },

    /// oxc reported parse errors for a script bundle.
    #[error("invalid script in `{path}`:\n{message}")]
    Script { path: PathBuf, message: String },

    #[error("failed to process image `{path}`")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("IO error at `{path}`")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid pattern `{pattern}`: {message}")]
    Pattern { pattern: String, message: String },
}

impl KilnError {
    pub fn io(path: impl AsRef<Path>, source: io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    pub fn pattern(pattern: &str, message: impl Into<String>) -> Self {
        Self::Pattern {
            pattern: pattern.to_string(),
            message: message.into(),
        }
    }

    /// The error and its sources on one line, `a: b: c`.
    pub fn report(&self) -> String {
        let mut out = self.to_string();
        let mut source = std::error::Error::source(self);
        while let Some(err) = source {
            out.push_str(": ");
            out.push_str(&err.to_string());
            source = err.source();
        }
        out
    }
}

/// Attach a path to `io::Result` errors.
pub trait IoContext<T> {
    fn at(self, path: impl AsRef<Path>) -> Result<T, KilnError>;
}

impl<T> IoContext<T> for io::Result<T> {
    fn at(self, path: impl AsRef<Path>) -> Result<T, KilnError> {
        self.map_err(|e| KilnError::io(path, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_io_context() {
        let result: io::Result<()> = Err(io::Error::new(io::ErrorKind::NotFound, "gone"));
        let err = result.at("dist/css/app.css").unwrap_err();
        assert_eq!(err.to_string(), "IO error at `dist/css/app.css`");
        assert_eq!(err.source().map(ToString::to_string).as_deref(), Some("gone"));
    }

    #[test]
    fn test_report_includes_source() {
        let err = KilnError::io("dist/img", io::Error::new(io::ErrorKind::PermissionDenied, "denied"));
        assert_eq!(err.report(), "IO error at `dist/img`: denied");
    }

    #[test]
    fn test_compile_message_keeps_stderr() {
        let err = KilnError::Compile {
            path: "assets/scss/app.scss".into(),
            message: "Error: expected \";\"".into(),
        };
        let shown = err.to_string();
        assert!(shown.starts_with("failed to compile `assets/scss/app.scss`"));
        assert!(shown.ends_with("Error: expected \";\""));
    }
}
