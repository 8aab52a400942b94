//! MCP server handler implementation.
//!
//! This module defines the main server handler that
//! routes tool calls to the appropriate implementations.
use crate::tools::cache::{clear_impl, purge_expired_impl};
use crate::tools::rewrite::{RewriteContentParams, RewriteUrlParams, rewrite_content_impl, rewrite_url_impl};
use crate::tools::settings::{settings_get_impl, settings_update_impl};

use redirect_uploads_core::settings::SettingsUpdate;
use redirect_uploads_core::{CacheDb, Rewriter};
use rmcp::{
    ErrorData as McpError, ServerHandler,
    handler::server::{
        tool::{ToolCallContext, ToolRouter},
        wrapper::Parameters,
    },
    model::{
        CallToolRequestParam, CallToolResult, Implementation, ListToolsResult, PaginatedRequestParam, ProtocolVersion,
        ServerCapabilities, ServerInfo,
    },
    service::{RequestContext, RoleServer},
    tool, tool_router,
};

/// The main MCP server handler for redirect-uploads.
#[derive(Clone)]
pub struct RedirectUploadsServer {
    tool_router: ToolRouter<Self>,
    rewriter: Rewriter,
    db: CacheDb,
}

/// Tool router implementation using the #[tool_router] macro.
///
/// This macro generates the routing logic that maps tool names to handler methods.
#[tool_router]
impl RedirectUploadsServer {
    /// Create a new server handler.
    pub fn new(rewriter: Rewriter, db: CacheDb) -> Self {
        Self { tool_router: Self::tool_router(), rewriter, db }
    }

    /// Output-buffer hook: rewrite a fully rendered response body.
    #[tool(description = "Rewrite a rendered page body. Missing uploads are pointed at the live domain.")]
    async fn rewrite_content(&self, params: Parameters<RewriteContentParams>) -> Result<CallToolResult, McpError> {
        rewrite_content_impl(&self.rewriter, params.0).await
    }

    /// Attachment-URL hook: rewrite one media URL.
    #[tool(description = "Rewrite a single attachment URL to the live domain if its file is missing locally.")]
    async fn rewrite_attachment_url(&self, params: Parameters<RewriteUrlParams>) -> Result<CallToolResult, McpError> {
        rewrite_url_impl(&self.rewriter, params.0).await
    }

    #[tool(description = "Show the live domain and cache duration currently in effect.")]
    async fn settings_get(&self) -> Result<CallToolResult, McpError> {
        settings_get_impl(&self.rewriter).await
    }

    #[tool(description = "Save the live domain and/or cache duration in seconds (0 disables caching).")]
    async fn settings_update(&self, params: Parameters<SettingsUpdate>) -> Result<CallToolResult, McpError> {
        settings_update_impl(&self.rewriter, params.0).await
    }

    #[tool(description = "Delete every cached rewrite so the next request recomputes it.")]
    async fn cache_clear(&self) -> Result<CallToolResult, McpError> {
        clear_impl(&self.rewriter).await
    }

    #[tool(description = "Delete cached rewrites whose lifetime has already ended.")]
    async fn cache_purge_expired(&self) -> Result<CallToolResult, McpError> {
        purge_expired_impl(&self.db).await
    }
}

impl ServerHandler for RedirectUploadsServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation {
                name: "redirect-uploads".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Default::default()
            },
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            instructions: Some(
                "Call rewrite_content on every rendered page and rewrite_attachment_url for single media URLs.".into(),
            ),
            ..Default::default()
        }
    }

    async fn list_tools(
        &self, _request: Option<PaginatedRequestParam>, _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, rmcp::model::ErrorData> {
        Ok(ListToolsResult { meta: None, tools: self.tool_router.list_all(), next_cursor: None })
    }

    async fn call_tool(
        &self, request: CallToolRequestParam, context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, rmcp::model::ErrorData> {
        self.tool_router
            .call(ToolCallContext::new(self, request, context))
            .await
    }
}
