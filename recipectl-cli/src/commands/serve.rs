//! HTTP server command for the recipe API

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;

use recipectl_core::RecipectlConfig;
use recipectl_server::{run_server, ServerConfig};

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Address to bind to (default from config: 127.0.0.1:8000)
    #[arg(long, short = 'b', env = "RECIPECTL_BIND")]
    pub bind: Option<SocketAddr>,

    /// Allow permissive CORS (all origins) - use with caution
    #[arg(long)]
    pub cors_permissive: bool,

    /// Most ingredients a recipe may have
    #[arg(long)]
    pub max_ingredients: Option<usize>,

    /// JSON array of recipes loaded at startup
    #[arg(long, value_name = "PATH")]
    pub seed: Option<PathBuf>,

    /// Serve local recipes only (no TheMealDB lookups)
    #[arg(long)]
    pub offline: bool,
}

/// Merge flags over the config file
fn server_config(args: ServeArgs, config: &RecipectlConfig) -> ServerConfig {
    let mut limits = config.limits();
    if let Some(max) = args.max_ingredients {
        limits.max_ingredients = max;
    }

    ServerConfig {
        bind_addr: args.bind.unwrap_or(config.server.bind),
        cors_permissive: args.cors_permissive || config.server.cors_permissive,
        limits,
        max_import_bytes: config.server.max_import_bytes,
        seed_file: args.seed.or_else(|| config.server.seed_file.clone()),
        external_api_url: (config.server.external_source && !args.offline)
            .then(|| config.server.external_api_url.clone()),
        external_timeout: Duration::from_secs(config.server.external_timeout_secs),
    }
}

/// Run the HTTP server
pub async fn run_serve(args: ServeArgs) -> Result<()> {
    let config = RecipectlConfig::load().context("Failed to load config")?;
    let server_config = server_config(args, &config);

    tracing::info!("Starting recipectl server on {}", server_config.bind_addr);

    // Run server (blocks until shutdown)
    run_server(server_config).await.context("Server error")?;

    Ok(())
}
