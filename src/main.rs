mod api;
mod app;
mod config;
mod lookup;
mod models;
mod ui;
mod utils;

use crate::app::{ AppState, build_router };
use crate::config::Config;
use crate::utils::SystemClock;

use anyhow::{ Context, Result };
use clap::Parser;
use std::{ net::SocketAddr, sync::Arc };
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let config = Config::parse();
    let bind_addr: SocketAddr = config.bind
        .parse()
        .with_context(|| format!("invalid --bind '{}': expected host:port", config.bind))?;

    let state = Arc::new(AppState::new(config, Arc::new(SystemClock)));
    let app = build_router(state);

    let listener = TcpListener::bind(bind_addr).await.with_context(||
        format!("failed to bind slash-command server on {bind_addr}")
    )?;
    tracing::info!(addr = %bind_addr, "slash-command server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        }).await
        .context("slash-command server exited unexpectedly")?;
    Ok(())
}

fn init_tracing() {
    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();

    tracing_subscriber::fmt().with_env_filter(env_filter).with_target(false).compact().init();
}
