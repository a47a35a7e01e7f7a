//! Server lifecycle management.

use crate::{
    actor::Coordinator, config::KilnConfig, core::register_server, log,
    reload::server::DEFAULT_WS_PORT,
};
use anyhow::{Result, anyhow};
use crossbeam::channel::{Receiver, Sender};
use std::{
    net::{IpAddr, SocketAddr},
    sync::Arc,
    thread::{self, JoinHandle},
    time::Duration,
};
use tiny_http::Server;

/// Maximum number of port binding attempts.
const MAX_PORT_RETRIES: u16 = 10;

/// Bind to the specified interface and port, with automatic port retry.
pub fn bind_with_retry(interface: IpAddr, base_port: u16) -> Result<(Server, SocketAddr)> {
    let mut last_error = None;

    for offset in 0..MAX_PORT_RETRIES {
        let port = base_port.saturating_add(offset);
        let addr = SocketAddr::new(interface, port);

        match Server::http(addr) {
            Ok(server) => {
                if offset > 0 {
                    log!("serve"; "port {} in use, using {} instead", base_port, port);
                }
                return Ok((server, addr));
            }
            Err(e) => last_error = Some(e),
        }
    }

    Err(anyhow!(
        "failed to bind after {} attempts (ports {}-{}): {}",
        MAX_PORT_RETRIES,
        base_port,
        base_port.saturating_add(MAX_PORT_RETRIES - 1),
        last_error.map(|e| e.to_string()).unwrap_or_default()
    ))
}

/// Register server for graceful shutdown.
///
/// When Ctrl+C is pressed, the global handler unblocks the server and
/// notifies the actors.
pub fn register_server_for_shutdown(server: Arc<Server>, shutdown_tx: Sender<()>) {
    register_server(Some(server), shutdown_tx);
}

/// Spawn the actor system (dist watcher, live reload, optional source watcher).
pub fn spawn_actors(config: Arc<KilnConfig>, shutdown_rx: Receiver<()>) -> JoinHandle<()> {
    thread::spawn(move || {
        if let Err(e) = run_actor_system(config, shutdown_rx) {
            log!("actor"; "error: {:#}", e);
        }
    })
}

fn run_actor_system(config: Arc<KilnConfig>, shutdown_rx: Receiver<()>) -> Result<()> {
    let rt = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()?;

    let watch_sources = config.serve.watch_sources;
    rt.block_on(
        Coordinator::with_config(config)
            .watch_sources(watch_sources)
            .with_live_reload(DEFAULT_WS_PORT)
            .with_shutdown_signal(shutdown_rx)
            .run(),
    )
}

/// Wait for actor system to shutdown gracefully (max 2 seconds).
pub fn wait_for_shutdown(handle: JoinHandle<()>) {
    for _ in 0..40 {
        if handle.is_finished() {
            let _ = handle.join();
            return;
        }
        thread::sleep(Duration::from_millis(50));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;

    #[test]
    fn test_bind_retries_next_port() {
        let localhost = IpAddr::V4(Ipv4Addr::LOCALHOST);
        let (first, addr) = bind_with_retry(localhost, 0).unwrap();
        let taken = first.server_addr().to_ip().map(|a| a.port()).unwrap();
        assert_eq!(addr.port(), 0);

        match bind_with_retry(localhost, taken) {
            Ok((_second, addr)) => assert_ne!(addr.port(), taken),
            // all neighbouring ports busy on this machine
            Err(e) => assert!(e.to_string().contains("10 attempts")),
        }
    }
}
