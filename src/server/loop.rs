// Server loop module
// Accept loop with graceful shutdown

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

use super::connection::accept_connection;
use super::signal::SignalHandler;
use crate::config;
use crate::logger;

/// How long to wait for in-flight connections after a shutdown signal
const DRAIN_TIMEOUT: Duration = Duration::from_secs(10);

/// Accept connections until a shutdown signal arrives, then drain.
pub async fn start_server_loop(
    listener: TcpListener,
    state: Arc<config::AppState>,
    active_connections: Arc<AtomicUsize>,
    signals: Arc<SignalHandler>,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        accept_connection(stream, peer_addr, &state, &active_connections);
                    }
                    Err(e) => {
                        logger::log_error(&format!("Failed to accept connection: {e}"));
                    }
                }
            }

            () = signals.shutdown.notified() => {
                if signals.shutdown_requested.load(Ordering::SeqCst) {
                    logger::log_shutdown(active_connections.load(Ordering::SeqCst));
                    break;
                }
            }
        }
    }

    // Stop accepting before draining
    drop(listener);
    drain_connections(&active_connections).await;
    println!("[Shutdown] Server stopped");
    Ok(())
}

/// Wait for in-flight connections to finish, bounded by `DRAIN_TIMEOUT`
async fn drain_connections(active_connections: &Arc<AtomicUsize>) {
    let deadline = tokio::time::Instant::now() + DRAIN_TIMEOUT;
    while active_connections.load(Ordering::SeqCst) > 0 {
        if tokio::time::Instant::now() >= deadline {
            logger::log_warning(&format!(
                "Drain timeout: {} connections still active",
                active_connections.load(Ordering::SeqCst)
            ));
            break;
        }
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
}
