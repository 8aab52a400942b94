//! cache_clear tool implementation.
//!
//! Deletes every cached rewrite. This is the admin "Clear Cache" button.

use redirect_uploads_core::{ClearReport, Rewriter};
use rmcp::{ErrorData as McpError, model::CallToolResult};

use crate::tools::json_result;

/// Implementation of the cache_clear tool.
pub async fn clear_impl(rewriter: &Rewriter) -> Result<CallToolResult, McpError> {
    let report: ClearReport = rewriter.clear_cache().await?;
    json_result(&report)
}
