//! Fast non-cryptographic hashing using FxHash.
//!
//! Used for change detection where collisions only cost a redundant rebuild
//! (config reloads). Output files are compared with blake3 in `freshness`.

use rustc_hash::FxHasher;
use std::hash::Hasher;

/// Compute 64-bit hash from byte data.
#[inline]
pub fn compute<T: AsRef<[u8]> + ?Sized>(data: &T) -> u64 {
    let mut hasher = FxHasher::default();
    hasher.write(data.as_ref());
    hasher.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compute_deterministic() {
        assert_eq!(compute("[serve]\nport = 3000"), compute("[serve]\nport = 3000"));
        assert_ne!(compute("[serve]\nport = 3000"), compute("[serve]\nport = 3001"));
    }
}
