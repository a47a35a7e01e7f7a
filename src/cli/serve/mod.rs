//! Development server with live reload support.
//!
//! ```text
//! default build ─> bind HTTP (port retry) ─> actors thread ─> request loop
//!                                            ├─ FsActor(dist) → WsActor
//!                                            └─ FsActor(sources) → RunnerActor
//! ```

mod content;
mod lifecycle;
mod path;
mod response;

use crate::{
    config::KilnConfig,
    core::is_shutdown,
    embed::serve::LIVERELOAD_URL,
    log,
    reload::server::DEFAULT_WS_PORT,
    task::{self, TaskName},
};
use anyhow::{Context, Result};
use crossbeam::channel;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicU16, Ordering};
use tiny_http::{Request, Server};

/// Actual WebSocket port (may differ from DEFAULT_WS_PORT if port was in use)
/// Updated by the coordinator after the WebSocket server binds
static ACTUAL_WS_PORT: AtomicU16 = AtomicU16::new(DEFAULT_WS_PORT);

/// Update the actual WebSocket port (called by coordinator after binding)
pub fn set_actual_ws_port(port: u16) {
    ACTUAL_WS_PORT.store(port, Ordering::Relaxed);
}

fn get_actual_ws_port() -> u16 {
    ACTUAL_WS_PORT.load(Ordering::Relaxed)
}

/// `serve`: build, then serve `{dist}` with live reload until Ctrl+C.
pub fn run_serve(config: Arc<KilnConfig>) -> Result<()> {
    task::run(&config, TaskName::Serve)?;

    let (server, addr) = lifecycle::bind_with_retry(config.serve.interface, config.serve.port)?;
    let server = Arc::new(server);

    let (shutdown_tx, shutdown_rx) = channel::unbounded::<()>();
    lifecycle::register_server_for_shutdown(Arc::clone(&server), shutdown_tx);

    log!("serve"; "http://{} ({})", addr, config.root_relative(config.dist_dir()).display());
    if config.serve.watch_sources {
        log!("serve"; "watching {}", config.root_relative(config.assets_dir()).display());
    }

    let actor_handle = lifecycle::spawn_actors(Arc::clone(&config), shutdown_rx);
    run_request_loop(&server, &config.dist_dir())?;
    lifecycle::wait_for_shutdown(actor_handle);
    Ok(())
}

fn run_request_loop(server: &Server, dist: &Path) -> Result<()> {
    // Pool so a slow (large or ranged) response doesn't hold up the rest
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(4)
        .build()
        .context("failed to create thread pool")?;

    let dist: Arc<Path> = Arc::from(dist);
    for request in server.incoming_requests() {
        let dist = Arc::clone(&dist);
        pool.spawn(move || {
            if let Err(e) = handle_request(request, &dist) {
                log!("serve"; "request error: {e:#}");
            }
        });
    }
    Ok(())
}

/// Handle a single HTTP request
fn handle_request(request: Request, dist: &Path) -> Result<()> {
    if is_shutdown() {
        return response::respond_unavailable(request);
    }

    let ws_port = get_actual_ws_port();
    if path::strip_query(request.url()) == LIVERELOAD_URL {
        return response::respond_livereload_js(request, ws_port);
    }

    match path::resolve_path(request.url(), dist) {
        Some(file) => response::respond_file(request, &file, Some(ws_port)),
        None => response::respond_not_found(request),
    }
}
