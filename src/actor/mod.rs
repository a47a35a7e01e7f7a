//! Actor System for watch and live reload
//!
//! Message-passing concurrency for the long-running tasks:
//!
//! ```text
//! FsActor(sources) --> RunnerActor          (watch, serve)
//!   (watch)             (rebuild tasks)
//! FsActor(dist)    --> WsActor --> browsers (serve)
//!   (watch)             (broadcast)
//! ```
//!
//! # Module Structure
//!
//! - `messages` - Message types for inter-actor communication
//! - `fs` - File system watcher with debouncing
//! - `runner` - Runs routed build steps off the event loop
//! - `ws` - WebSocket broadcast
//! - `coordinator` - Wires up and runs actors

pub mod coordinator;
pub mod fs;
pub mod messages;
pub mod runner;
pub mod ws;

pub use coordinator::Coordinator;
