//! Subcommand implementations.
//!
//! Each writes its result to `out` so tests can capture it.

use std::io::{Read, Write};
use std::path::Path;

use anyhow::{Context, Result};
use redirect_uploads_core::settings::SettingsUpdate;
use redirect_uploads_core::{CacheDb, Rewriter};

pub async fn run_rewrite(
    rewriter: &Rewriter, input: Option<&Path>, output: Option<&Path>, out: &mut impl Write,
) -> Result<()> {
    let content = match input {
        Some(path) => std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf).context("reading stdin")?;
            buf
        }
    };

    let rewritten = rewriter.rewrite(&content).await;

    match output {
        Some(path) => std::fs::write(path, rewritten).with_context(|| format!("writing {}", path.display()))?,
        None => out.write_all(rewritten.as_bytes())?,
    }

    Ok(())
}

pub async fn run_rewrite_url(rewriter: &Rewriter, url: &str, out: &mut impl Write) -> Result<()> {
    let rewritten = rewriter.rewrite_attachment_url(url).await;
    writeln!(out, "{rewritten}")?;
    Ok(())
}

pub async fn run_settings_show(rewriter: &Rewriter, out: &mut impl Write) -> Result<()> {
    let settings = rewriter.settings().await?;
    writeln!(out, "{}", serde_json::to_string_pretty(&settings)?)?;
    Ok(())
}

pub async fn run_settings_set(
    rewriter: &Rewriter, live_domain: Option<String>, cache_duration: Option<u64>, out: &mut impl Write,
) -> Result<()> {
    let update = SettingsUpdate { live_domain, cache_duration_seconds: cache_duration };
    let settings = rewriter.update_settings(update).await?;
    writeln!(out, "Settings saved")?;
    writeln!(out, "{}", serde_json::to_string_pretty(&settings)?)?;
    Ok(())
}

pub async fn run_cache_clear(rewriter: &Rewriter, out: &mut impl Write) -> Result<()> {
    let report = rewriter.clear_cache().await?;
    writeln!(out, "Cleared {} cached rewrite(s)", report.deleted)?;
    if report.failed > 0 {
        writeln!(out, "{} entr(ies) could not be deleted", report.failed)?;
    }
    Ok(())
}

pub async fn run_purge_expired(db: &CacheDb, out: &mut impl Write) -> Result<()> {
    let deleted = db.purge_expired_transients().await?;
    writeln!(out, "Purged {deleted} expired rewrite(s)")?;
    Ok(())
}
