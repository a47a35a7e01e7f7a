//! Live reload for `serve`.
//!
//! ```text
//! FsActor(dist) -> WsActor -> browsers
//!                    ^
//!   server (accept) -+
//! ```
//!
//! - `message` - JSON frames sent to the browser
//! - `server` - WebSocket acceptor with port retry

pub mod message;
pub mod server;
