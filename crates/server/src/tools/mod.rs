//! MCP tool implementations.
//!
//! This module contains all tools exposed by the redirect-uploads server.

pub mod cache;
pub mod rewrite;
pub mod settings;

use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, Content},
};
use serde::Serialize;

use redirect_uploads_core::Error;

/// Serialize a tool output as pretty JSON text content.
pub(crate) fn json_result<T: Serialize>(output: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(output)
        .map_err(|e| Error::InvalidInput(format!("Failed to serialize output: {e}")))?;

    Ok(CallToolResult::success(vec![Content::text(json)]))
}

/// Decode the JSON text a tool returned.
#[cfg(test)]
pub(crate) fn output_of<T: serde::de::DeserializeOwned>(result: &CallToolResult) -> T {
    let content_val = serde_json::to_value(&result.content[0]).unwrap();
    let text = content_val
        .get("text")
        .and_then(|v| v.as_str())
        .expect("Expected text field in content");
    serde_json::from_str(text).unwrap()
}

#[cfg(test)]
pub(crate) mod fixture {
    use std::sync::Arc;

    use redirect_uploads_core::settings::LIVE_DOMAIN_OPTION;
    use redirect_uploads_core::{AppConfig, CacheDb, LocalFiles, Rewriter};
    use tempfile::TempDir;

    /// Rewriter for `https://example.test` with an uploads dir holding `kept.jpg`.
    pub(crate) async fn rewriter() -> (TempDir, CacheDb, Rewriter) {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("kept.jpg"), b"jpg").unwrap();

        let config = AppConfig {
            home_url: "https://example.test".into(),
            uploads_path: "uploads".into(),
            uploads_dir: dir.path().to_path_buf(),
            ..Default::default()
        };
        let db = CacheDb::open_in_memory().await.unwrap();
        db.set_option(LIVE_DOMAIN_OPTION, "https://example.com").await.unwrap();
        let rewriter =
            Rewriter::new(&config, Arc::new(LocalFiles::new(dir.path())), Arc::new(db.clone()), Arc::new(db.clone()));

        (dir, db, rewriter)
    }
}
