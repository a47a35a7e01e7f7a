//! Content hashing using blake3.
//!
//! Outputs are only rewritten when their bytes change, so the dist watcher
//! doesn't push reloads for rebuilds that produced identical files.

use std::fs::{self, File};
use std::io::{self, BufReader, Read};
use std::path::Path;

/// A 256-bit content hash (blake3 output).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct ContentHash([u8; 32]);

impl ContentHash {
    /// Hash an in-memory buffer.
    #[inline]
    fn of(bytes: &[u8]) -> Self {
        Self(*blake3::hash(bytes).as_bytes())
    }

    /// Create a hash representing "no content" (all zeros).
    #[inline]
    const fn empty() -> Self {
        Self([0; 32])
    }
}

/// Compute blake3 hash of file contents. Unreadable files hash to [`ContentHash::empty`].
fn file_hash(path: &Path) -> ContentHash {
    let file = match File::open(path) {
        Ok(f) => f,
        Err(_) => return ContentHash::empty(),
    };

    let mut reader = BufReader::with_capacity(64 * 1024, file);
    let mut hasher = blake3::Hasher::new();
    let mut buffer = [0u8; 64 * 1024];

    loop {
        match reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => {
                hasher.update(&buffer[..n]);
            }
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(_) => return ContentHash::empty(),
        }
    }

    ContentHash(*hasher.finalize().as_bytes())
}

/// Write `content` to `path` unless the file already holds the same bytes.
///
/// Creates parent directories. Returns `true` if the file was written.
pub fn write_if_changed(path: &Path, content: &[u8]) -> io::Result<bool> {
    if path.is_file() && file_hash(path) == ContentHash::of(content) {
        return Ok(false);
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)?;
    Ok(true)
}
