//! cache_purge_expired tool implementation.
//!
//! Expired rows are already invisible to the rewriter; this reclaims their space.

use redirect_uploads_core::CacheDb;
use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::tools::json_result;

/// Output from the cache_purge_expired tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CachePurgeOutput {
    /// Number of entries deleted.
    pub deleted: u64,
}

/// Implementation of the cache_purge_expired tool.
pub async fn purge_expired_impl(cache: &CacheDb) -> Result<CallToolResult, McpError> {
    let deleted = cache.purge_expired_transients().await?;
    json_result(&CachePurgeOutput { deleted })
}
