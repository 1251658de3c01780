//! clone-proxy server entry point.

use anyhow::{Context, Result};
use clap::Parser;
use clone_proxy::cli::Args;
use clone_proxy::config::ProxyConfig;
use clone_proxy::prediction::HttpPredictionClient;
use clone_proxy::proxy::CloneProxy;
use clone_proxy::server;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // A local .env may supply REPLICATE_API_TOKEN; it must load before parsing.
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(args.log_filter()));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let config = ProxyConfig::from_args(&args);
    if config.api_token().is_none() {
        tracing::warn!("REPLICATE_API_TOKEN is not set; clone requests will fail");
    }
    tracing::debug!(?config, "loaded configuration");

    let client = HttpPredictionClient::new(
        &config.api_base_url,
        config.request_timeout,
        config.connect_timeout,
    )
    .context("Failed to build prediction client")?;
    let app = server::router(CloneProxy::new(client, config));

    let listener = tokio::net::TcpListener::bind((args.host.as_str(), args.port))
        .await
        .with_context(|| format!("Failed to bind {}:{}", args.host, args.port))?;

    tracing::info!(
        address = %listener.local_addr().context("Failed to read listen address")?,
        "clone-proxy listening"
    );

    axum::serve(listener, app)
        .await
        .context("Server terminated unexpectedly")?;

    Ok(())
}
