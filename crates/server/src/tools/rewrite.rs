//! Content hook tools.
//!
//! `rewrite_content` is the output-buffer hook and receives a whole rendered
//! page; `rewrite_attachment_url` is the per-attachment URL filter.

use redirect_uploads_core::Rewriter;
use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::json_result;

/// Parameters for the rewrite_content tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct RewriteContentParams {
    /// The rendered response body.
    pub content: String,
}

/// Output from the rewrite_content tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct RewriteContentOutput {
    /// The body with missing uploads pointed at the live domain.
    pub content: String,
}

/// Parameters for the rewrite_attachment_url tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct RewriteUrlParams {
    /// The attachment URL as the CMS would emit it.
    pub url: String,
}

/// Output from the rewrite_attachment_url tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct RewriteUrlOutput {
    pub url: String,
}

/// Implementation of the rewrite_content tool.
///
/// Never fails on content problems: unmatched or unparseable input comes back as is.
pub async fn rewrite_content_impl(
    rewriter: &Rewriter, params: RewriteContentParams,
) -> Result<CallToolResult, McpError> {
    let content = rewriter.rewrite(&params.content).await;
    json_result(&RewriteContentOutput { content })
}

/// Implementation of the rewrite_attachment_url tool.
pub async fn rewrite_url_impl(rewriter: &Rewriter, params: RewriteUrlParams) -> Result<CallToolResult, McpError> {
    let url = rewriter.rewrite_attachment_url(&params.url).await;
    json_result(&RewriteUrlOutput { url })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::{fixture, output_of};

    #[tokio::test]
    async fn test_rewrite_content_redirects_missing() {
        let (_dir, _db, rewriter) = fixture::rewriter().await;
        let content = concat!(
            r#"<img src="https://example.test/uploads/2024/a.jpg">"#,
            r#"<img src="https://example.test/uploads/kept.jpg">"#,
        );
        let params = RewriteContentParams { content: content.to_string() };

        let result = rewrite_content_impl(&rewriter, params).await.unwrap();
        let output: RewriteContentOutput = output_of(&result);
        assert_eq!(
            output.content,
            r#"<img src="https://example.com/uploads/2024/a.jpg"><img src="https://example.test/uploads/kept.jpg">"#
        );
    }

    #[tokio::test]
    async fn test_rewrite_content_without_matches() {
        let (_dir, _db, rewriter) = fixture::rewriter().await;
        let params = RewriteContentParams { content: "<p>hello</p>".to_string() };

        let result = rewrite_content_impl(&rewriter, params).await.unwrap();
        let output: RewriteContentOutput = output_of(&result);
        assert_eq!(output.content, "<p>hello</p>");
    }

    #[tokio::test]
    async fn test_rewrite_attachment_url() {
        let (_dir, _db, rewriter) = fixture::rewriter().await;
        let params = RewriteUrlParams { url: "//example.test/uploads/2023/05/b.png".to_string() };

        let result = rewrite_url_impl(&rewriter, params).await.unwrap();
        let output: RewriteUrlOutput = output_of(&result);
        assert_eq!(output.url, "https://example.com/uploads/2023/05/b.png");
    }
}
