//! Actor Message Definitions
//!
//! ```text
//! FsActor(sources) --Run/ReloadConfig--> RunnerActor
//! FsActor(dist)    --Reload/Css-------->  WsActor
//! ```

use std::net::TcpStream;
use std::path::PathBuf;

use crate::task::TaskName;

/// Messages to the RunnerActor
#[derive(Debug)]
pub enum RunnerMsg {
    /// Run build steps, each once, in the given order
    Run {
        tasks: Vec<TaskName>,
        /// Paths that triggered this run (for the status line)
        changed: Vec<PathBuf>,
    },
    /// Config file changed: reload it, then run `default`
    ReloadConfig,
    /// Shutdown
    Shutdown,
}

/// Messages to the WsActor
#[derive(Debug)]
pub enum WsMsg {
    /// Reload every connected page
    Reload { reason: String },
    /// Swap one stylesheet, `path` is its URL path
    Css { path: String },
    /// Take over a freshly accepted connection
    AddClient(TcpStream),
    /// Close all clients
    Shutdown,
}
