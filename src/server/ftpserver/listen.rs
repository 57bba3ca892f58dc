//! Listens for control connections and spawns a session loop for each.

use crate::server::controlchan::{spawn_loop, LoopConfig};
use tokio::net::TcpListener;
use tokio::sync::watch;

pub async fn run(listener: TcpListener, config: LoopConfig, mut shutdown: watch::Receiver<()>) {
    let logger = config.logger.clone();
    slog::info!(logger, "Accepting control connections");
    loop {
        tokio::select! {
            accepted = listener.accept() => match accepted {
                Ok((tcp_stream, socket_addr)) => {
                    slog::info!(logger, "Incoming control connection from {:?}", socket_addr);
                    if let Err(err) = spawn_loop(config.clone(), tcp_stream).await {
                        slog::error!(logger, "Could not spawn control loop for connection from {:?}: {:?}", socket_addr, err);
                    }
                }
                Err(err) => {
                    slog::error!(logger, "Error accepting incoming control connection: {:?}", err);
                }
            },
            // stop() drops the sender; either way this arm means we're done.
            _ = shutdown.changed() => {
                slog::info!(logger, "Shutting down the accept loop");
                return;
            }
        }
    }
}
