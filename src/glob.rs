//! Shell-style input patterns.
//!
//! Supported syntax:
//!
//! | Syntax   | Matches                                   |
//! |----------|-------------------------------------------|
//! | `*`      | any run of characters except `/`          |
//! | `**`     | any number of directories (whole segment) |
//! | `?`      | one character except `/`                  |
//! | `{a,b}`  | either alternative (nestable)             |
//! | `[abc]`  | character class, `[!abc]` negates         |
//!
//! A pattern is split into a literal base directory and a glob remainder.
//! Expansion walks the base with jwalk and matches each file's path relative
//! to the base. Hidden entries are skipped while walking.
//!
//! A pattern without metacharacters is a literal path and must exist.

use std::path::{Path, PathBuf};

use jwalk::WalkDir;
use regex::Regex;
use rustc_hash::FxHashSet;

use crate::pipeline::KilnError;
use crate::utils::path::to_slash;

const META: &[char] = &['*', '?', '[', '{'];

/// A compiled input pattern.
#[derive(Debug, Clone)]
pub struct Pattern {
    /// Leading segments without metacharacters.
    base: PathBuf,
    /// Matcher for the remainder, `None` for literal paths.
    regex: Option<Regex>,
}

impl Pattern {
    pub fn new(pattern: &str) -> Result<Self, KilnError> {
        let pattern = pattern.trim();
        if pattern.is_empty() {
            return Err(KilnError::pattern(pattern, "empty pattern"));
        }

        let normalized = pattern.replace('\\', "/");
        let segments: Vec<&str> = normalized.split('/').collect();
        let split = segments
            .iter()
            .position(|s| s.contains(META))
            .unwrap_or(segments.len());

        let mut base = segments[..split].join("/");
        if base.is_empty() && normalized.starts_with('/') {
            base.push('/');
        }

        if split == segments.len() {
            return Ok(Self {
                base: PathBuf::from(base),
                regex: None,
            });
        }

        let remainder = segments[split..].join("/");
        let source = translate(&remainder).map_err(|msg| KilnError::pattern(pattern, msg))?;
        let regex = Regex::new(&format!("^{source}$"))
            .map_err(|e| KilnError::pattern(pattern, e.to_string()))?;

        Ok(Self {
            base: PathBuf::from(base),
            regex: Some(regex),
        })
    }

    /// Literal directory the pattern starts from (relative unless the pattern is absolute).
    pub fn base(&self) -> &Path {
        &self.base
    }

    pub fn is_literal(&self) -> bool {
        self.regex.is_none()
    }

    /// Whether `path` (absolute, or relative to `root`) is selected by this pattern.
    pub fn matches(&self, root: &Path, path: &Path) -> bool {
        let base = root.join(&self.base);
        let path = root.join(path);
        match &self.regex {
            None => path == base,
            Some(regex) => path
                .strip_prefix(&base)
                .ok()
                .and_then(to_slash)
                .is_some_and(|rel| regex.is_match(&rel)),
        }
    }

    /// Expand into sorted absolute file paths under `root`.
    ///
    /// A literal path that doesn't exist is [`KilnError::InputMissing`];
    /// a glob with no match is empty.
    pub fn expand(&self, root: &Path) -> Result<Vec<PathBuf>, KilnError> {
        let base = root.join(&self.base);

        let Some(regex) = &self.regex else {
            return if base.is_file() {
                Ok(vec![base])
            } else {
                Err(KilnError::InputMissing(base))
            };
        };

        if !base.is_dir() {
            return Ok(Vec::new());
        }

        let mut files: Vec<PathBuf> = WalkDir::new(&base)
            .follow_links(true)
            .into_iter()
            .filter_map(Result::ok)
            .filter(|e| e.file_type().is_file())
            .map(|e| e.path())
            .filter(|path| {
                path.strip_prefix(&base)
                    .ok()
                    .and_then(to_slash)
                    .is_some_and(|rel| regex.is_match(&rel))
            })
            .collect();
        files.sort();
        Ok(files)
    }
}

/// Expand a pattern list in order, dropping files already selected.
pub fn expand_all<S: AsRef<str>>(root: &Path, patterns: &[S]) -> Result<Vec<PathBuf>, KilnError> {
    let mut seen = FxHashSet::default();
    let mut files = Vec::new();
    for pattern in patterns {
        for file in Pattern::new(pattern.as_ref())?.expand(root)? {
            if seen.insert(file.clone()) {
                files.push(file);
            }
        }
    }
    Ok(files)
}

/// Translate the glob remainder into regex source.
fn translate(glob: &str) -> Result<String, String> {
    let chars: Vec<char> = glob.chars().collect();
    let mut out = String::with_capacity(glob.len() * 2);
    let mut depth = 0usize;
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        match c {
            '*' if chars.get(i + 1) == Some(&'*') => {
                let at_start = i == 0 || chars[i - 1] == '/';
                let next = chars.get(i + 2);
                if at_start && next == Some(&'/') {
                    out.push_str("(?:[^/]*/)*");
                    i += 3;
                    continue;
                }
                if at_start && next.is_none() {
                    out.push_str(".*");
                    i += 2;
                    continue;
                }
                out.push_str("[^/]*");
                i += 2;
                continue;
            }
            '*' => out.push_str("[^/]*"),
            '?' => out.push_str("[^/]"),
            '{' => {
                depth += 1;
                out.push_str("(?:");
            }
            '}' if depth > 0 => {
                depth -= 1;
                out.push(')');
            }
            ',' if depth > 0 => out.push('|'),
            '[' => {
                let close = chars[i + 1..]
                    .iter()
                    .enumerate()
                    .skip(1)
                    .find(|(_, ch)| **ch == ']')
                    .map(|(offset, _)| i + 1 + offset)
                    .ok_or_else(|| "unclosed `[`".to_string())?;
                out.push('[');
                let mut j = i + 1;
                if chars[j] == '!' || chars[j] == '^' {
                    out.push('^');
                    j += 1;
                }
                for &ch in &chars[j..close] {
                    if ch == '\\' || ch == '[' {
                        out.push('\\');
                    }
                    out.push(ch);
                }
                out.push(']');
                i = close + 1;
                continue;
            }
            _ => out.push_str(&regex::escape(&c.to_string())),
        }
        i += 1;
    }

    if depth > 0 {
        return Err("unclosed `{`".to_string());
    }
    Ok(out)
}
