//! redirect-uploads MCP server entry point.
//!
//! Boots the MCP server on stdio transport so a CMS host can call the content
//! hooks and admin actions as tools. Logging goes to stderr to avoid
//! interfering with the JSON-RPC protocol on stdout.

use anyhow::{Context, Result};
use redirect_uploads_core::{AppConfig, CacheDb, Rewriter};
use rmcp::service::serve_server;
use rmcp::transport::io::stdio;
use tracing_subscriber::EnvFilter;

mod handler;
mod tools;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .json()
        .init();

    let config = AppConfig::load().context("loading configuration")?;
    let db = CacheDb::open(&config.db_path)
        .await
        .with_context(|| format!("opening cache database at {}", config.db_path.display()))?;

    tracing::info!(
        home_url = %config.home_url,
        uploads_dir = %config.uploads_dir.display(),
        "Starting redirect-uploads server on stdio transport"
    );

    let handler = handler::RedirectUploadsServer::new(Rewriter::with_db(&config, db.clone()), db);
    let transport = stdio();
    let server = serve_server(handler, transport).await?;

    server.waiting().await?;

    Ok(())
}
