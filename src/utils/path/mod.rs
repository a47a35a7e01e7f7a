//! Path utilities.
//!
//! - [`fs`]: Filesystem path normalization (`normalize_path`)
//! - [`rel`]: Forward-slash relative paths for matching and URLs

pub mod fs;
pub mod rel;

pub use fs::normalize_path;
pub use rel::{relative, to_slash, url_path};
