pub mod api;
pub mod assets;
pub mod config;
pub mod serial;
pub mod switch;

use std::sync::Arc;

use anyhow::Context;

use config::{BridgeConfig, DeviceSource};
use serial::{MockLink, SerialInterface};
use switch::SwitchController;

/// Open the device and serve HTTP until Ctrl-C.
///
/// Failing to open the serial port ends the run before anything is served.
pub async fn run(config: BridgeConfig) -> anyhow::Result<()> {
    let interface = match &config.device {
        DeviceSource::Port { path, baud_rate } => {
            SerialInterface::open(path, *baud_rate, config.read_timeout)?
        }
        DeviceSource::Mock => {
            log::warn!("Using mock device, no hardware will be switched");
            SerialInterface::from_link("mock", Box::new(MockLink::echo()))
        }
    };

    let controller = Arc::new(SwitchController::new(interface));
    let routes = api::routes(controller.clone(), config.static_dir.clone());

    let (addr, server) = warp::serve(routes)
        .try_bind_with_graceful_shutdown(config.listen_addr, shutdown_signal())
        .with_context(|| format!("Failed to bind {}", config.listen_addr))?;

    log::info!("Listening on http://{}", addr);
    server.await;

    match Arc::try_unwrap(controller) {
        Ok(controller) => controller.into_transport().close(),
        Err(_) => log::warn!("Requests still in flight at shutdown, port closes when they finish"),
    }
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Unable to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    log::info!("Shutdown requested");
}
