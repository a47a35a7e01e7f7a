//! Running external tools (the stylesheet compiler).
//!
//! ```ignore
//! let output = Cmd::from_slice(&config.styles.compiler)
//!     .arg(input)
//!     .cwd(root)
//!     .quiet(&["More info"])
//!     .run()?;
//! let css = String::from_utf8_lossy(&output.stdout);
//! ```
//!
//! Stdout is captured for the caller. Stderr of a successful run is echoed as
//! warnings, minus lines starting with one of the `quiet` prefixes. A non-zero
//! exit becomes [`ExecError::Status`] with the cleaned stderr.

use crate::log;
use regex::Regex;
use std::{
    borrow::Cow,
    ffi::{OsStr, OsString},
    io,
    path::{Path, PathBuf},
    process::{Command, ExitStatus, Output},
    sync::LazyLock,
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExecError {
    #[error("no command configured")]
    Empty,

    #[error("cannot run `{program}`: {source}")]
    Spawn { program: String, source: io::Error },

    #[error("`{program}` exited with {status}{}", indent(.stderr))]
    Status {
        program: String,
        status: ExitStatus,
        stderr: String,
    },
}

/// Builder for one external process run.
#[derive(Debug, Default)]
pub struct Cmd {
    program: OsString,
    args: Vec<OsString>,
    cwd: Option<PathBuf>,
    quiet: &'static [&'static str],
}

impl Cmd {
    /// From a configured argv such as `["sass", "--no-source-map"]` or
    /// `["npx", "sass"]`.
    pub fn from_slice<S: AsRef<OsStr>>(argv: &[S]) -> Self {
        let mut argv = argv.iter().map(|s| s.as_ref().to_owned());
        Self {
            program: argv.next().unwrap_or_default(),
            args: argv.collect(),
            ..Default::default()
        }
    }

    /// Append an argument. Empty arguments are dropped.
    pub fn arg<S: AsRef<OsStr>>(mut self, arg: S) -> Self {
        let arg = arg.as_ref();
        if !arg.is_empty() {
            self.args.push(arg.to_owned());
        }
        self
    }

    pub fn cwd<P: AsRef<Path>>(mut self, dir: P) -> Self {
        self.cwd = Some(dir.as_ref().to_owned());
        self
    }

    /// Stderr line prefixes never worth echoing.
    pub fn quiet(mut self, prefixes: &'static [&'static str]) -> Self {
        self.quiet = prefixes;
        self
    }

    pub fn run(self) -> Result<Output, ExecError> {
        if self.program.is_empty() {
            return Err(ExecError::Empty);
        }
        let program = self.program.to_string_lossy().into_owned();

        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        if let Some(dir) = &self.cwd {
            cmd.current_dir(dir);
        }
        let output = cmd.output().map_err(|source| ExecError::Spawn {
            program: program.clone(),
            source,
        })?;

        let stderr = self.cleaned_stderr(&output.stderr);
        if !output.status.success() {
            return Err(ExecError::Status {
                program,
                status: output.status,
                stderr,
            });
        }
        if !stderr.is_empty() {
            log!("warning"; "{}: {}", program, stderr);
        }
        Ok(output)
    }

    /// Stderr without colour codes, blank lines, or quiet lines.
    fn cleaned_stderr(&self, raw: &[u8]) -> String {
        let text = String::from_utf8_lossy(raw);
        strip_ansi(&text)
            .lines()
            .filter(|line| {
                let line = line.trim();
                !line.is_empty() && !self.quiet.iter().any(|p| line.starts_with(p))
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

pub fn strip_ansi(s: &str) -> Cow<'_, str> {
    static ANSI: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"\x1b\[[0-9;]*[A-Za-z]").expect("valid ANSI regex")
    });
    ANSI.replace_all(s, "")
}

fn indent(stderr: &str) -> String {
    if stderr.is_empty() {
        String::new()
    } else {
        format!("\n{stderr}")
    }
}
