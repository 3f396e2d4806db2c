//! SiteForge server entry point.

use std::net::SocketAddr;

use clap::Parser;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use forge_server::config::ServerConfig;
use forge_server::routes::build_router;
use forge_server::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(
            EnvFilter::from_default_env()
                .add_directive("forge=info".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .try_init();

    let config = ServerConfig::parse();
    let state = AppState::build(&config);
    let router = build_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, preview_port = config.preview_port, "SiteForge listening");
    axum::serve(listener, router).await?;
    Ok(())
}
