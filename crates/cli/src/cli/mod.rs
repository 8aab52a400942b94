//! CLI for redirect-uploads.

mod commands;

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use redirect_uploads_core::{AppConfig, CacheDb, Rewriter};

use commands::{run_cache_clear, run_purge_expired, run_rewrite, run_rewrite_url, run_settings_set, run_settings_show};

/// Top-level CLI for redirect-uploads.
#[derive(Debug, Parser)]
#[command(name = "redirect-uploads", version)]
#[command(about = "Point local upload URLs at the live site when the file is missing locally", long_about = None)]
pub struct Cli {
    /// Log at debug level unless RUST_LOG says otherwise.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Rewrite a rendered page (stdin to stdout by default).
    Rewrite {
        /// Read content from this file instead of stdin.
        #[arg(long, short, value_name = "PATH")]
        input: Option<PathBuf>,

        /// Write the result to this file instead of stdout.
        #[arg(long, short, value_name = "PATH")]
        output: Option<PathBuf>,
    },

    /// Rewrite a single attachment URL.
    RewriteUrl {
        url: String,
    },

    /// Show or change the rewrite settings.
    #[command(subcommand)]
    Settings(SettingsCommand),

    /// Manage cached rewrites.
    #[command(subcommand)]
    Cache(CacheCommand),
}

#[derive(Debug, Subcommand)]
pub enum SettingsCommand {
    /// Print the settings in effect as JSON.
    Show,

    /// Save new settings. Unspecified values are kept.
    Set {
        /// Live site base URL, e.g. https://example.com.
        #[arg(long, value_name = "URL")]
        live_domain: Option<String>,

        /// Seconds to keep a rewritten page; 0 disables caching.
        #[arg(long, value_name = "SECS")]
        cache_duration: Option<u64>,
    },
}

#[derive(Debug, Subcommand)]
pub enum CacheCommand {
    /// Delete every cached rewrite.
    Clear,

    /// Delete cached rewrites that have already expired.
    PurgeExpired,
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        let config = AppConfig::load().context("loading configuration")?;
        tracing::debug!(?config, "loaded config");

        let db = CacheDb::open(&config.db_path)
            .await
            .with_context(|| format!("opening cache database at {}", config.db_path.display()))?;
        let rewriter = Rewriter::with_db(&config, db.clone());

        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        self.command.dispatch(&rewriter, &db, &mut out).await?;
        out.flush()?;

        Ok(())
    }
}

impl CliCommand {
    async fn dispatch(self, rewriter: &Rewriter, db: &CacheDb, out: &mut impl Write) -> Result<()> {
        match self {
            CliCommand::Rewrite { input, output } => {
                run_rewrite(rewriter, input.as_deref(), output.as_deref(), out).await?;
            }
            CliCommand::RewriteUrl { url } => run_rewrite_url(rewriter, &url, out).await?,
            CliCommand::Settings(SettingsCommand::Show) => run_settings_show(rewriter, out).await?,
            CliCommand::Settings(SettingsCommand::Set { live_domain, cache_duration }) => {
                run_settings_set(rewriter, live_domain, cache_duration, out).await?;
            }
            CliCommand::Cache(CacheCommand::Clear) => run_cache_clear(rewriter, out).await?,
            CliCommand::Cache(CacheCommand::PurgeExpired) => run_purge_expired(db, out).await?,
        }

        Ok(())
    }
}
