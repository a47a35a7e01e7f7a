//! Freshness detection: content-hash (blake3) for outputs, mtime for copies.

mod hash;
mod mtime;

pub use hash::write_if_changed;
pub use mtime::is_newer_than;
