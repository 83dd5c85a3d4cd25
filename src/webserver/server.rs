/// Axum server lifecycle
use axum::Router;
use std::future::Future;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;

use super::routes;
use crate::config::WebserverConfig;
use crate::errors::{BotError, BotResult};
use crate::logger::{self, LogTag};
use crate::trader::ControlHandle;

/// Serve until `shutdown` resolves
pub async fn start_server<F>(
    config: &WebserverConfig,
    control: ControlHandle,
    shutdown: F,
) -> BotResult<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .map_err(|e| BotError::Config(format!("Invalid bind address: {}", e)))?;

    let listener = TcpListener::bind(&addr).await.map_err(|e| match e.kind() {
        std::io::ErrorKind::AddrInUse => BotError::Config(format!(
            "Failed to bind to {}: address already in use (is another skrybot running?)",
            addr
        )),
        _ => BotError::Config(format!("Failed to bind to {}: {}", addr, e)),
    })?;

    logger::info(
        LogTag::Webserver,
        &format!("Admin API listening on http://{}/api", addr),
    );

    axum::serve(listener, build_app(control))
        .with_graceful_shutdown(async move {
            shutdown.await;
            logger::debug(LogTag::Webserver, "Received shutdown signal, stopping webserver...");
        })
        .await
        .map_err(|e| BotError::Network(format!("Server error: {}", e)))?;

    logger::debug(LogTag::Webserver, "Webserver stopped");
    Ok(())
}

fn build_app(control: ControlHandle) -> Router {
    routes::create_router(control).layer(CorsLayer::permissive())
}
