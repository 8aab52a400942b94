//! Application configuration with layered loading.
//!
//! This module describes the local site the rewriter runs against and where its
//! state lives. It uses figment for layered configuration loading:
//!
//! 1. Environment variables (REDIRECT_UPLOADS_*)
//! 2. TOML config file (if REDIRECT_UPLOADS_CONFIG_FILE set)
//! 3. Built-in defaults
//!
//! The live domain and cache duration are not part of this file; they are
//! admin-editable options, see [`crate::settings`].

use std::path::PathBuf;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

mod validation;

pub use validation::ConfigError;

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (REDIRECT_UPLOADS_*)
/// 2. TOML config file (if REDIRECT_UPLOADS_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Home URL of the local site, e.g. `https://example.test:8443`.
    ///
    /// Set via REDIRECT_UPLOADS_HOME_URL environment variable.
    #[serde(default = "default_home_url")]
    pub home_url: String,

    /// URL path of the uploads subtree, without leading or trailing slash.
    ///
    /// Set via REDIRECT_UPLOADS_UPLOADS_PATH environment variable.
    #[serde(default = "default_uploads_path")]
    pub uploads_path: String,

    /// Filesystem directory that backs `uploads_path`.
    ///
    /// Set via REDIRECT_UPLOADS_UPLOADS_DIR environment variable.
    #[serde(default = "default_uploads_dir")]
    pub uploads_dir: PathBuf,

    /// Path to the SQLite database holding transients and options.
    ///
    /// Set via REDIRECT_UPLOADS_DB_PATH environment variable.
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,
}

fn default_home_url() -> String {
    "http://localhost".into()
}

fn default_uploads_path() -> String {
    "wp-content/uploads".into()
}

fn default_uploads_dir() -> PathBuf {
    PathBuf::from("./wp-content/uploads")
}

fn default_db_path() -> PathBuf {
    PathBuf::from("./redirect-uploads.sqlite")
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            home_url: default_home_url(),
            uploads_path: default_uploads_path(),
            uploads_dir: default_uploads_dir(),
            db_path: default_db_path(),
        }
    }
}

impl AppConfig {
    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables prefixed with `REDIRECT_UPLOADS_`
    /// 2. TOML file from `REDIRECT_UPLOADS_CONFIG_FILE` (if set)
    /// 3. Built-in defaults via `Default::default()`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("REDIRECT_UPLOADS_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed("REDIRECT_UPLOADS_")
                .ignore(&["CONFIG_FILE"])
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }

    /// The uploads path with any surrounding slashes removed.
    pub fn uploads_path_trimmed(&self) -> &str {
        self.uploads_path.trim_matches('/')
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.home_url, "http://localhost");
        assert_eq!(config.uploads_path, "wp-content/uploads");
        assert_eq!(config.uploads_dir, PathBuf::from("./wp-content/uploads"));
        assert_eq!(config.db_path, PathBuf::from("./redirect-uploads.sqlite"));
    }

    #[test]
    fn test_uploads_path_trimmed() {
        let config = AppConfig { uploads_path: "/media/files/".into(), ..Default::default() };
        assert_eq!(config.uploads_path_trimmed(), "media/files");
    }

    #[test]
    fn test_load_from_env() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("REDIRECT_UPLOADS_HOME_URL", "https://example.test");
            jail.set_env("REDIRECT_UPLOADS_UPLOADS_PATH", "uploads");

            let config = AppConfig::load().expect("config loads");
            assert_eq!(config.home_url, "https://example.test");
            assert_eq!(config.uploads_path, "uploads");
            assert_eq!(config.db_path, PathBuf::from("./redirect-uploads.sqlite"));
            Ok(())
        });
    }

    #[test]
    fn test_env_overrides_file() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "redirect-uploads.toml",
                r#"
                home_url = "https://from-file.test"
                uploads_dir = "/srv/uploads"
                "#,
            )?;
            jail.set_env("REDIRECT_UPLOADS_CONFIG_FILE", "redirect-uploads.toml");
            jail.set_env("REDIRECT_UPLOADS_HOME_URL", "https://from-env.test");

            let config = AppConfig::load().expect("config loads");
            assert_eq!(config.home_url, "https://from-env.test");
            assert_eq!(config.uploads_dir, PathBuf::from("/srv/uploads"));
            Ok(())
        });
    }

    #[test]
    fn test_load_rejects_invalid_file_values() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("REDIRECT_UPLOADS_UPLOADS_PATH", "../etc");
            let result = AppConfig::load();
            assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "uploads_path"));
            Ok(())
        });
    }
}
