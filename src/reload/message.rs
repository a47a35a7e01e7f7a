//! Live reload message protocol.
//!
//! JSON frames sent from the server to browser clients:
//!
//! - `{"type":"reload"}`: reload the page
//! - `{"type":"css","path":"/css/app.css"}`: swap one stylesheet in place
//! - `{"type":"connected","version":"0.3.0"}`: sent once per connection

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum LiveReloadMessage {
    /// Full page reload
    Reload,

    /// Stylesheet update, `path` is the URL path under dist
    Css { path: String },

    /// Connection established
    Connected {
        /// Server version for compatibility check
        version: String,
    },
}

impl LiveReloadMessage {
    pub fn css(path: impl Into<String>) -> Self {
        Self::Css { path: path.into() }
    }

    pub fn connected() -> Self {
        Self::Connected {
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    pub fn to_json(&self) -> String {
        // Serialising a tagged enum of strings cannot fail
        serde_json::to_string(self).unwrap_or_else(|_| r#"{"type":"reload"}"#.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_format() {
        assert_eq!(LiveReloadMessage::Reload.to_json(), r#"{"type":"reload"}"#);
        assert_eq!(
            LiveReloadMessage::css("/css/app.css").to_json(),
            r#"{"type":"css","path":"/css/app.css"}"#
        );

        let connected: serde_json::Value =
            serde_json::from_str(&LiveReloadMessage::connected().to_json()).unwrap();
        assert_eq!(connected["type"], "connected");
        assert_eq!(connected["version"], env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn test_parse() {
        let msg: LiveReloadMessage = serde_json::from_str(r#"{"type":"css","path":"/a.css"}"#).unwrap();
        assert_eq!(msg, LiveReloadMessage::css("/a.css"));
    }
}
