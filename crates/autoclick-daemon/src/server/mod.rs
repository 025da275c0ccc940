pub mod connection;

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use tokio::net::{UnixListener, UnixStream};
use tokio::signal::unix::{SignalKind, signal};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use autoclick_core::controller::spawn_controller;

use crate::bridge::BridgeHost;
use crate::errors::DaemonError;
use crate::types::DaemonConfig;

use connection::{ConnectionContext, handle_connection};

/// Upper bound on the final best-effort stop before the socket goes away.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

/// Run the daemon until a peer sends `daemon_stop` or a signal arrives.
pub async fn run_server(config: DaemonConfig) -> Result<(), DaemonError> {
    prepare_socket_path(&config.socket_path).await?;
    let listener = UnixListener::bind(&config.socket_path)?;

    info!(
        event = "daemon.server.started",
        socket = %config.socket_path.display(),
    );

    let host = Arc::new(BridgeHost::new(config.response_timeout));
    let controller = spawn_controller(Arc::clone(&host), config.controller);
    let ctx = ConnectionContext {
        host,
        controller: controller.clone(),
        stop_requested: CancellationToken::new(),
        closing: CancellationToken::new(),
    };

    let mut sigterm = signal(SignalKind::terminate())?;
    let mut next_connection_id: u64 = 1;

    loop {
        tokio::select! {
            accepted = listener.accept() => match accepted {
                Ok((stream, _)) => {
                    let connection_id = next_connection_id;
                    next_connection_id += 1;
                    tokio::spawn(handle_connection(stream, ctx.clone(), connection_id));
                }
                Err(e) => {
                    warn!(event = "daemon.server.accept_failed", error = %e);
                }
            },
            _ = ctx.stop_requested.cancelled() => break,
            _ = tokio::signal::ctrl_c() => {
                info!(event = "daemon.server.signal_received", signal = "SIGINT");
                break;
            }
            _ = sigterm.recv() => {
                info!(event = "daemon.server.signal_received", signal = "SIGTERM");
                break;
            }
        }
    }

    // Pages stay connected until the cycle is wound down so the final
    // timer update can still reach them.
    match tokio::time::timeout(SHUTDOWN_GRACE, controller.stop()).await {
        Ok(Ok(report)) => info!(
            event = "daemon.server.cycle_stopped",
            was_running = report.was_running,
            cycles_completed = report.cycles_completed,
        ),
        Ok(Err(e)) => warn!(event = "daemon.server.cycle_stop_failed", error = %e),
        Err(_) => warn!(event = "daemon.server.cycle_stop_timeout"),
    }
    ctx.closing.cancel();

    if let Err(e) = std::fs::remove_file(&config.socket_path) {
        warn!(
            event = "daemon.server.socket_cleanup_failed",
            socket = %config.socket_path.display(),
            error = %e,
        );
    }

    info!(event = "daemon.server.stopped");
    Ok(())
}

/// Refuse to start over a live daemon; clear a stale socket file otherwise.
async fn prepare_socket_path(socket_path: &Path) -> Result<(), DaemonError> {
    if socket_path.exists() {
        if UnixStream::connect(socket_path).await.is_ok() {
            return Err(DaemonError::AlreadyRunning(
                socket_path.display().to_string(),
            ));
        }
        info!(
            event = "daemon.server.stale_socket_removed",
            socket = %socket_path.display(),
        );
        std::fs::remove_file(socket_path)?;
    }

    if let Some(parent) = socket_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_prepare_removes_stale_socket_file() {
        let dir = tempfile::tempdir().unwrap();
        let socket = dir.path().join("nested").join("autoclick.sock");
        std::fs::create_dir_all(socket.parent().unwrap()).unwrap();
        std::fs::write(&socket, b"").unwrap();

        prepare_socket_path(&socket).await.unwrap();

        assert!(!socket.exists());
    }

    #[tokio::test]
    async fn test_prepare_creates_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        let socket = dir.path().join("a").join("b").join("autoclick.sock");

        prepare_socket_path(&socket).await.unwrap();

        assert!(socket.parent().unwrap().is_dir());
    }

    #[tokio::test]
    async fn test_prepare_refuses_live_socket() {
        let dir = tempfile::tempdir().unwrap();
        let socket = dir.path().join("autoclick.sock");
        let _listener = UnixListener::bind(&socket).unwrap();

        let err = prepare_socket_path(&socket).await.unwrap_err();

        assert!(matches!(err, DaemonError::AlreadyRunning(_)));
    }
}
