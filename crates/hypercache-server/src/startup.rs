//! Server startup utilities.

use std::net::SocketAddr;
use tokio::signal;
use tracing::{error, info};

/// Prints the startup banner.
pub fn print_banner() {
    info!(r#"
    __  __                      ______           __
   / / / /_  ______  ___  _____/ ____/___ ______/ /_  ___
  / /_/ / / / / __ \/ _ \/ ___/ /   / __ `/ ___/ __ \/ _ \
 / __  / /_/ / /_/ /  __/ /  / /___/ /_/ / /__/ / / /  __/
/_/ /_/\__, / .___/\___/_/   \____/\__,_/\___/_/ /_/\___/
      /____/_/
    "#);
}

/// Prints the addresses the running servers are bound to.
pub fn print_startup_info(rest_addr: Option<SocketAddr>, grpc_addr: Option<SocketAddr>) {
    let separator = "=".repeat(60);
    info!("{}", separator);
    if let Some(addr) = rest_addr {
        info!("HTTP API:  http://{}/cache", addr);
        info!("Health:    http://{}/health", addr);
        info!("API Docs:  http://{}/api-docs/openapi.json", addr);
    }
    if let Some(addr) = grpc_addr {
        info!("gRPC API:  http://{}", addr);
    }
    info!("{}", separator);
}

/// Completes on Ctrl+C or, on Unix, SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received Ctrl+C, initiating graceful shutdown...");
        }
        () = terminate => {
            info!("Received terminate signal, initiating graceful shutdown...");
        }
    }
}
