//! Configuration section definitions.
//!
//! Each module corresponds to a section in `kiln.toml`:
//!
//! | Module    | TOML Section             | Purpose                              |
//! |-----------|--------------------------|--------------------------------------|
//! | `paths`   | `[paths]`, `[patterns]`  | Source/output roots, watch patterns  |
//! | `bundle`  | `[[*.bundle]]`           | Output file ← ordered input list     |
//! | `styles`  | `[styles]`               | Stylesheet bundles and browser floor |
//! | `scripts` | `[scripts]`              | Script bundles                       |
//! | `assets`  | `[images]`, `[fonts]`    | Image recompression, font copying    |
//! | `serve`   | `[serve]`, `[watch]`     | Development server and watcher       |

mod assets;
mod bundle;
mod paths;
mod scripts;
mod serve;
mod styles;

pub use assets::{FontsConfig, ImagesConfig};
pub use bundle::BundleConfig;
pub use paths::{PathsConfig, PatternsConfig};
pub use scripts::ScriptsConfig;
pub use serve::{ServeConfig, WatchConfig};
pub use styles::StylesConfig;
