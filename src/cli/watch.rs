//! `watch`: build once, then rebuild the affected tasks on every source change.

use crate::{
    actor::Coordinator,
    config::KilnConfig,
    core::register_server,
    log,
    task::{self, TaskName},
};
use anyhow::Result;
use crossbeam::channel;
use std::sync::Arc;

pub fn run_watch(config: Arc<KilnConfig>) -> Result<()> {
    task::run(&config, TaskName::Watch)?;

    let (shutdown_tx, shutdown_rx) = channel::unbounded::<()>();
    register_server(None, shutdown_tx);

    log!("watch"; "watching {} (Ctrl+C to stop)",
        config.root_relative(config.assets_dir()).display());

    let rt = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()?;

    rt.block_on(
        Coordinator::with_config(config)
            .watch_sources(true)
            .with_shutdown_signal(shutdown_rx)
            .run(),
    )
}
