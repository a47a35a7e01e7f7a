//! Embedded static resources.
//!
//! # Module Structure
//!
//! - `template` - Template types for typed variable injection
//! - `serve` - Dev server resources (livereload.js)
//!
//! # Usage
//!
//! ```ignore
//! use embed::serve::{LIVERELOAD_JS, LiveReloadVars};
//!
//! let js = LIVERELOAD_JS.render(&LiveReloadVars { ws_port: 35729 });
//! ```

mod template;

pub use template::{Template, TemplateVars};

pub mod serve {
    use super::{Template, TemplateVars};

    /// URL the live reload client is served from.
    pub const LIVERELOAD_URL: &str = "/__kiln/livereload.js";

    /// Variables for livereload.js.
    pub struct LiveReloadVars {
        pub ws_port: u16,
    }

    impl TemplateVars for LiveReloadVars {
        fn apply(&self, content: &str) -> String {
            content.replace("__KILN_WS_PORT__", &self.ws_port.to_string())
        }
    }

    /// Live reload client, minified at build time.
    pub const LIVERELOAD_JS: Template<LiveReloadVars> =
        Template::new(include_str!(concat!(env!("OUT_DIR"), "/livereload.min.js")));

    /// `<script>` tag injected into served HTML.
    pub fn script_tag() -> String {
        format!(r#"<script src="{LIVERELOAD_URL}" defer></script>"#)
    }
}

#[cfg(test)]
mod tests {
    use super::serve::*;

    #[test]
    fn test_livereload_port_injection() {
        let rendered = LIVERELOAD_JS.render(&LiveReloadVars { ws_port: 35731 });
        assert!(rendered.contains("35731"));
        assert!(!rendered.contains("__KILN_WS_PORT__"));
        assert!(rendered.contains("WebSocket"));
    }

    #[test]
    fn test_script_tag() {
        assert_eq!(
            script_tag(),
            r#"<script src="/__kiln/livereload.js" defer></script>"#
        );
    }
}
