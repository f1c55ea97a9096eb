mod args;
mod server;

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use ssx_core::Dispatcher;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::args::{Cli, LogFormat};

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    match format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        // Without a signal handler the server runs until killed.
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_format);

    // (A) Store + scheduler は 1 プロセスにつき 1 つ（再起動で消える）
    let dispatcher = Arc::new(Dispatcher::new());

    // (B) HTTP front door
    let listener = TcpListener::bind(cli.bind)
        .await
        .with_context(|| format!("could not listen on {}", cli.bind))?;
    info!(addr = %listener.local_addr()?, "ssx simulator listening");

    server::serve(listener, dispatcher.clone(), shutdown_signal()).await?;

    // (C) 予約済みの completion を落とさない。もう一度 Ctrl+C で即終了
    let counts = dispatcher.counts();
    info!(?counts, "server stopped; waiting for in-flight completions");
    tokio::select! {
        _ = dispatcher.wait_idle() => info!("all completions applied"),
        _ = tokio::signal::ctrl_c() => info!("forced exit"),
    }

    Ok(())
}
