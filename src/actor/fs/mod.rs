//! FileSystem Actor
//!
//! Watches a set of roots and turns debounced batches into messages for the
//! next actor. The same actor runs in two roles:
//!
//! ```text
//! sources: Watcher → Debouncer → reconcile → route_changes → RunnerMsg
//! dist:    Watcher → Debouncer → reconcile → css / reload  → WsMsg
//! ```
//!
//! The watcher starts in [`FsActor::new`], so events that happen while the
//! caller is still busy are buffered rather than lost.

use std::path::PathBuf;
use std::time::Duration;

use notify::RecommendedWatcher;
use tokio::sync::mpsc;

use super::messages::{RunnerMsg, WsMsg};
use crate::config::cfg;

// Reconcile batches with the filesystem.
mod classifier;
// Pure timing and deduplication.
mod debouncer;
// Batches -> messages.
mod router;
// Shared fs event types.
mod types;
// Watch root attach/re-attach lifecycle.
mod watch_roots;


use debouncer::Debouncer;
use router::{dist_messages, log_batch, source_message};
use types::ChangeBatch;
use watch_roots::WatchRoots;

pub use watch_roots::WatchRoot;

/// Where a watcher's batches go.
pub enum ChangeSink {
    /// Source changes rebuild through the runner
    Runner(mpsc::Sender<RunnerMsg>),
    /// Dist changes notify browsers; paths are made URLs relative to `dist`
    Browser {
        tx: mpsc::Sender<WsMsg>,
        dist: PathBuf,
    },
}

/// FileSystem Actor - watches for file changes
pub struct FsActor {
    /// Channel to receive notify events (sync -> async bridge)
    notify_rx: std::sync::mpsc::Receiver<notify::Result<notify::Event>>,
    /// Watcher handle (must be kept alive)
    watcher: RecommendedWatcher,
    watch_roots: WatchRoots,
    sink: ChangeSink,
    debouncer: Debouncer,
}

impl FsActor {
    /// Start watching `roots` immediately.
    pub fn new(roots: Vec<WatchRoot>, sink: ChangeSink, debounce: Duration) -> notify::Result<Self> {
        let (notify_tx, notify_rx) = std::sync::mpsc::channel();

        let mut watcher = notify::recommended_watcher(move |res| {
            let _ = notify_tx.send(res);
        })?;

        let mut watch_roots = WatchRoots::new(roots);
        watch_roots.attach_existing(&mut watcher)?;

        Ok(Self {
            notify_rx,
            watcher,
            watch_roots,
            sink,
            debouncer: Debouncer::new(debounce),
        })
    }

    /// Run the actor event loop until the receiving actor goes away.
    pub async fn run(self) {
        let Self {
            notify_rx,
            mut watcher,
            mut watch_roots,
            sink,
            mut debouncer,
        } = self;

        let (async_tx, mut async_rx) = mpsc::channel::<notify::Event>(64);

        // notify delivers on a std channel; bridge it into tokio
        std::thread::spawn(move || {
            while let Ok(result) = notify_rx.recv() {
                match result {
                    Ok(event) => {
                        if async_tx.blocking_send(event).is_err() {
                            break;
                        }
                    }
                    Err(e) => crate::log!("watch"; "notify error: {}", e),
                }
            }
        });

        loop {
            tokio::select! {
                biased;
                Some(event) = async_rx.recv() => debouncer.add_event(&event),
                _ = tokio::time::sleep(debouncer.sleep_duration()) => {
                    watch_roots.maintain(&mut watcher);
                    let Some(batch) = debouncer.take_if_ready() else {
                        continue;
                    };
                    if dispatch(classifier::reconcile(batch), &sink).await.is_err() {
                        break;
                    }
                }
            }
        }
    }
}

/// Send one batch on. `Err(())` once the receiver has shut down.
async fn dispatch(batch: ChangeBatch, sink: &ChangeSink) -> Result<(), ()> {
    if batch.is_empty() {
        return Ok(());
    }
    log_batch(&batch);

    match sink {
        ChangeSink::Runner(tx) => {
            let config = cfg();
            if let Some(msg) = source_message(&batch, &config) {
                tx.send(msg).await.map_err(|_| ())?;
            }
        }
        ChangeSink::Browser { tx, dist } => {
            for msg in dist_messages(&batch, dist) {
                tx.send(msg).await.map_err(|_| ())?;
            }
        }
    }
    Ok(())
}
