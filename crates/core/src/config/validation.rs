//! Configuration validation rules.
//!
//! This module provides validation logic for `AppConfig` values
//! after they have been loaded from environment, files, or defaults.

use crate::config::AppConfig;
use thiserror::Error;

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("invalid configuration: {field} - {reason}")]
    Invalid { field: String, reason: String },
}

impl AppConfig {
    /// Validate configuration values after loading.
    ///
    /// An unparseable `home_url` is only logged: the rewriter passes content
    /// through untouched in that case.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if:
    /// - `uploads_path` is empty or contains a `..` segment
    /// - `db_path` is empty
    pub fn validate(&self) -> Result<(), ConfigError> {
        let uploads_path = self.uploads_path_trimmed();
        if uploads_path.is_empty() {
            return Err(ConfigError::Invalid { field: "uploads_path".into(), reason: "must not be empty".into() });
        }
        if uploads_path.split('/').any(|segment| segment == "..") {
            return Err(ConfigError::Invalid {
                field: "uploads_path".into(),
                reason: "must not contain '..' segments".into(),
            });
        }

        if self.db_path.as_os_str().is_empty() {
            return Err(ConfigError::Invalid { field: "db_path".into(), reason: "must not be empty".into() });
        }

        match url::Url::parse(&self.home_url) {
            Ok(parsed) if parsed.host_str().is_some() => {}
            _ => {
                tracing::warn!(
                    home_url = %self.home_url,
                    "home_url has no parseable host; content will pass through unmodified"
                );
            }
        }

        Ok(())
    }
}
