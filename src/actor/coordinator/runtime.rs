use std::time::Duration;

use crossbeam::channel::Receiver;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::actor::fs::FsActor;
use crate::actor::messages::{RunnerMsg, WsMsg};
use crate::actor::runner::RunnerActor;
use crate::actor::ws::WsActor;

/// Actors wired up by the coordinator, each with its own inbox sender.
#[derive(Default)]
pub(super) struct Actors {
    pub fs: Vec<FsActor>,
    pub runner: Option<(RunnerActor, mpsc::Sender<RunnerMsg>)>,
    pub ws: Option<(WsActor, mpsc::Sender<WsMsg>)>,
}

/// Run all actors until a shutdown signal (or until every watcher stops).
pub(super) async fn run_actors(actors: Actors, shutdown_rx: Option<Receiver<()>>) {
    let mut watchers: Vec<JoinHandle<()>> = actors
        .fs
        .into_iter()
        .map(|fs| tokio::spawn(fs.run()))
        .collect();

    let runner = actors
        .runner
        .map(|(actor, tx)| (tokio::spawn(actor.run()), tx));
    let ws = actors.ws.map(|(actor, tx)| (tokio::spawn(actor.run()), tx));

    match shutdown_rx {
        Some(rx) => loop {
            if rx.try_recv().is_ok() || watchers.iter().all(JoinHandle::is_finished) {
                crate::debug!("actor"; "shutdown signal received");
                break;
            }
            tokio::time::sleep(Duration::from_millis(100)).await;
        },
        None => {
            for handle in watchers.drain(..) {
                let _ = handle.await;
            }
        }
    }

    for handle in &watchers {
        handle.abort();
    }

    // Let an in-flight run finish writing before the process exits
    if let Some((handle, tx)) = runner {
        let _ = tx.send(RunnerMsg::Shutdown).await;
        let _ = tokio::time::timeout(Duration::from_secs(2), handle).await;
    }
    if let Some((handle, tx)) = ws {
        let _ = tx.send(WsMsg::Shutdown).await;
        let _ = tokio::time::timeout(Duration::from_millis(500), handle).await;
    }
}
