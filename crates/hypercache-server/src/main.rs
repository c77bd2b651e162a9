//! # HyperCache Server
//!
//! Main entry point for the HyperCache application.
//!
//! Supports three deployment roles:
//! - **all**: store client, internal gRPC service and HTTP gateway in one process
//! - **service**: store client and internal gRPC service
//! - **gateway**: HTTP gateway calling a remote internal service

use hypercache_config::{AppConfig, ConfigLoader};
use hypercache_core::HyperCacheResult;
use hypercache_server::{
    startup::{print_banner, print_startup_info, shutdown_signal},
    telemetry::init_logging,
    AppBuilder,
};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    let config = match ConfigLoader::from_default_location() {
        Ok(loader) => loader.get().await,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config.observability);
    print_banner();

    info!("Starting HyperCache Server...");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = run(config).await {
        error!("Application error: {}", e);
        std::process::exit(1);
    }
}

async fn run(config: AppConfig) -> HyperCacheResult<()> {
    info!("Environment: {}", config.app.environment);
    info!("Deployment role: {}", config.deployment.role);

    let app = AppBuilder::new().with_config(config).start().await?;
    print_startup_info(app.rest_addr(), app.grpc_addr());

    app.run_until(shutdown_signal()).await?;

    info!("Server shutdown complete");
    Ok(())
}
