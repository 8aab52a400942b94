//! Admin settings tools.

use redirect_uploads_core::Rewriter;
use redirect_uploads_core::settings::{Settings, SettingsUpdate};
use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::json_result;

/// Output from the settings tools.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SettingsOutput {
    /// Confirmation shown after a save.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub settings: Settings,
}

/// Implementation of the settings_get tool.
pub async fn settings_get_impl(rewriter: &Rewriter) -> Result<CallToolResult, McpError> {
    let settings = rewriter.settings().await?;
    json_result(&SettingsOutput { message: None, settings })
}

/// Implementation of the settings_update tool.
pub async fn settings_update_impl(rewriter: &Rewriter, params: SettingsUpdate) -> Result<CallToolResult, McpError> {
    let settings = rewriter.update_settings(params).await?;
    json_result(&SettingsOutput { message: Some("Settings saved".to_string()), settings })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::{fixture, output_of};

    #[tokio::test]
    async fn test_settings_get() {
        let (_dir, _db, rewriter) = fixture::rewriter().await;

        let result = settings_get_impl(&rewriter).await.unwrap();
        let output: SettingsOutput = output_of(&result);
        assert!(output.message.is_none());
        assert_eq!(output.settings.live_domain, "https://example.com");
        assert_eq!(output.settings.cache_duration_seconds, 1800);
    }

    #[tokio::test]
    async fn test_settings_update() {
        let (_dir, _db, rewriter) = fixture::rewriter().await;
        let params =
            SettingsUpdate { live_domain: Some("https://live.example.org/".into()), cache_duration_seconds: Some(60) };

        let result = settings_update_impl(&rewriter, params).await.unwrap();
        let output: SettingsOutput = output_of(&result);
        assert_eq!(output.message.as_deref(), Some("Settings saved"));
        assert_eq!(output.settings.live_domain, "https://live.example.org");

        let rewritten = rewriter.rewrite("https://example.test/uploads/gone.jpg").await;
        assert_eq!(rewritten, "https://live.example.org/uploads/gone.jpg");
    }

    #[tokio::test]
    async fn test_settings_update_rejects_bad_domain() {
        let (_dir, _db, rewriter) = fixture::rewriter().await;
        let params = SettingsUpdate { live_domain: Some("ftp://example.com".into()), cache_duration_seconds: None };

        let err = settings_update_impl(&rewriter, params).await.unwrap_err();
        assert_eq!(err.code.0, -32003);
    }

    #[tokio::test]
    async fn test_settings_update_requires_a_field() {
        let (_dir, _db, rewriter) = fixture::rewriter().await;

        let err = settings_update_impl(&rewriter, SettingsUpdate::default()).await.unwrap_err();
        assert_eq!(err.code.0, -32602);
    }
}
