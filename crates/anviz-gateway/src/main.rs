mod cli;

use anviz_network::{GatewayServer, RawDumpServer, TracingSink};
use anyhow::Context;
use clap::Parser;
use cli::Cli;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Console logging. `RUST_LOG` wins over `--log-level` when set.
fn init_tracing(level: &str) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .with_context(|| format!("invalid log level '{level}'"))?;

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false))
        .try_init()
        .context("failed to initialize tracing subscriber")
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level)?;

    info!(version = anviz_core::VERSION, "Starting Anviz gateway");

    if cli.raw_dump {
        let addr = cli.listen_addr();
        let server = RawDumpServer::bind(&addr, Duration::from_secs(cli.debug_idle_secs))
            .await
            .with_context(|| format!("failed to start raw dump server on {addr}"))?;
        server.run().await;
        return Ok(());
    }

    let config = cli.gateway_config();
    let server = GatewayServer::bind(config, Arc::new(TracingSink))
        .await
        .context("failed to start gateway")?;
    server.run().await;

    Ok(())
}
