use std::sync::Arc;

use clap::Parser;
use multinomial_server::{
    config::ServerConfig,
    server::{AppState, create_router},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::parse();
    env_logger::builder()
        .format_timestamp_secs()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();
    log::info!("Starting multinomial API server with config: {:?}", config);

    if let Some(dir) = &config.static_dir {
        log::info!("Serving static files from {}", dir.display());
    }
    if config.seed.is_some() {
        log::info!("Seeded generator: simulations are reproducible for a fixed request order");
    }

    let address = config.bind_address();
    let app = create_router(Arc::new(AppState::new(config)));

    let listener = tokio::net::TcpListener::bind(&address).await?;
    log::info!("Server is running on {}. Press Ctrl+C to stop.", address);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    log::info!("Stopping server...");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        log::error!("Failed to install Ctrl+C handler: {}", err);
        std::future::pending::<()>().await;
    }
}
