use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pointmap::config::load_config;
use pointmap::HttpServer;

/// Map frontend: points on a slippy map, backed by two upstream APIs.
#[derive(Debug, Parser)]
#[command(name = "pointmap", version)]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the configured bind address.
    #[arg(long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing subscriber
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pointmap=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("pointmap v0.1.0 starting");

    let cli = Cli::parse();
    let mut config = load_config(cli.config.as_deref())?;
    if let Some(bind) = cli.bind {
        config.listener.bind_address = bind;
    }

    tracing::info!(
        bind_address = %config.listener.bind_address,
        point_api = %config.upstream.point_api_url,
        thing_api = %config.upstream.thing_api_url,
        upstream_timeout_secs = config.upstream.timeout_secs,
        "Configuration loaded"
    );

    let server = HttpServer::new(config)?;
    server.run().await?;

    Ok(())
}
