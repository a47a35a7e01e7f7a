//! Actor Coordinator - wires up the watch actor system
//!
//! The Coordinator is a thin orchestrator that:
//! - Creates communication channels
//! - Wires up the actors `watch` or `serve` need
//! - Runs them until Ctrl+C

mod runtime;
mod watch_paths;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Result, anyhow};
use crossbeam::channel::Receiver;
use tokio::sync::mpsc;

use super::fs::{ChangeSink, FsActor};
use super::messages::{RunnerMsg, WsMsg};
use super::runner::RunnerActor;
use super::ws::WsActor;
use crate::config::KilnConfig;

const CHANNEL_BUFFER: usize = 32;

/// Coordinator - wires up and runs the actor system.
pub struct Coordinator {
    config: Arc<KilnConfig>,
    /// Rebuild on source changes
    watch_sources: bool,
    /// Watch dist and push reloads, WebSocket base port
    live_reload: Option<u16>,
    shutdown_rx: Option<Receiver<()>>,
}

impl Coordinator {
    pub fn with_config(config: Arc<KilnConfig>) -> Self {
        Self {
            config,
            watch_sources: false,
            live_reload: None,
            shutdown_rx: None,
        }
    }

    /// Run the source watcher and the task runner.
    pub fn watch_sources(mut self, enabled: bool) -> Self {
        self.watch_sources = enabled;
        self
    }

    /// Run the dist watcher and the WebSocket actor on `port` (or the next free one).
    pub fn with_live_reload(mut self, port: u16) -> Self {
        self.live_reload = Some(port);
        self
    }

    /// Set shutdown signal receiver.
    pub fn with_shutdown_signal(mut self, rx: Receiver<()>) -> Self {
        self.shutdown_rx = Some(rx);
        self
    }

    /// Run the actor system.
    pub async fn run(self) -> Result<()> {
        let debounce = Duration::from_millis(self.config.watch.debounce_ms);
        let mut actors = runtime::Actors::default();

        if self.watch_sources {
            let (runner_tx, runner_rx) = mpsc::channel::<RunnerMsg>(CHANNEL_BUFFER);
            let roots = watch_paths::source_roots(&self.config);
            let fs = FsActor::new(roots, ChangeSink::Runner(runner_tx.clone()), debounce)
                .map_err(|e| anyhow!("source watcher failed: {}", e))?;

            actors.fs.push(fs);
            actors.runner = Some((RunnerActor::new(runner_rx), runner_tx));
        }

        if let Some(port) = self.live_reload {
            let (ws_tx, ws_rx) = mpsc::channel::<WsMsg>(CHANNEL_BUFFER);
            match crate::reload::server::start_ws_server(port, ws_tx.clone()) {
                Ok(actual) => crate::cli::serve::set_actual_ws_port(actual),
                Err(e) => crate::log!("actor"; "websocket server failed: {}", e),
            }

            let dist = self.config.dist_dir();
            let sink = ChangeSink::Browser {
                tx: ws_tx.clone(),
                dist: dist.clone(),
            };
            let fs = FsActor::new(watch_paths::dist_roots(&self.config), sink, debounce)
                .map_err(|e| anyhow!("dist watcher failed: {}", e))?;

            actors.fs.push(fs);
            actors.ws = Some((WsActor::new(ws_rx), ws_tx));
        }

        crate::debug!("actor"; "start");
        runtime::run_actors(actors, self.shutdown_rx).await;
        crate::debug!("actor"; "stopped");
        Ok(())
    }
}
