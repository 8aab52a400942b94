//! Admin-editable rewrite settings.
//!
//! Two options drive the rewriter: the live domain that missing uploads are
//! redirected to, and how long rewritten content is cached. Both are stored in
//! an [`OptionStore`] and re-read on every rewrite.

pub mod options;

use std::time::Duration;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::Error;

pub use options::OptionStore;

/// Option name holding the live domain.
pub const LIVE_DOMAIN_OPTION: &str = "redirect_uploads_live_domain";

/// Option name holding the cache duration in seconds.
pub const CACHE_DURATION_OPTION: &str = "redirect_uploads_cache_duration";

pub const DEFAULT_CACHE_DURATION_SECS: u64 = 1800;

/// Upper bound accepted from the admin form (30 days).
pub const MAX_CACHE_DURATION_SECS: u64 = 30 * 24 * 60 * 60;

/// Current rewrite settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Settings {
    /// Base URL of the live site, without trailing slash.
    pub live_domain: String,
    /// Lifetime of a cached rewrite. Zero disables caching.
    pub cache_duration_seconds: u64,
}

impl Settings {
    /// Defaults for a site served from `home_url`.
    ///
    /// Returns `None` when `home_url` has no parseable host.
    pub fn defaults_for(home_url: &str) -> Option<Self> {
        Some(Self {
            live_domain: default_live_domain(home_url)?,
            cache_duration_seconds: DEFAULT_CACHE_DURATION_SECS,
        })
    }

    /// Cache TTL, or `None` when caching is disabled.
    pub fn cache_ttl(&self) -> Option<Duration> {
        (self.cache_duration_seconds > 0).then(|| Duration::from_secs(self.cache_duration_seconds))
    }

    /// Validate and normalise values coming from the admin form.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidUrl` if `live_domain` is not an absolute
    /// http(s) URL with a host, and `Error::InvalidInput` if the cache
    /// duration exceeds [`MAX_CACHE_DURATION_SECS`].
    pub fn validate(mut self) -> Result<Self, Error> {
        self.live_domain = normalize_live_domain(&self.live_domain)?;

        if self.cache_duration_seconds > MAX_CACHE_DURATION_SECS {
            return Err(Error::InvalidInput(format!(
                "cache_duration_seconds must not exceed {MAX_CACHE_DURATION_SECS}"
            )));
        }

        Ok(self)
    }
}

/// Derive the default live domain from the local home URL.
///
/// The final dot-separated label of the host becomes `com`; the scheme is kept
/// and any port or path is dropped. `https://shop.example.test:8443` becomes
/// `https://shop.example.com`.
pub fn default_live_domain(home_url: &str) -> Option<String> {
    let parsed = url::Url::parse(home_url).ok()?;
    let host = parsed.host_str()?;

    let mut labels: Vec<&str> = host.split('.').collect();
    if let Some(last) = labels.last_mut() {
        *last = "com";
    }

    Some(format!("{}://{}", parsed.scheme(), labels.join(".")))
}

fn normalize_live_domain(raw: &str) -> Result<String, Error> {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(Error::InvalidUrl("live_domain must not be empty".into()));
    }

    let parsed = url::Url::parse(trimmed).map_err(|e| Error::InvalidUrl(format!("{trimmed}: {e}")))?;
    match parsed.scheme() {
        "http" | "https" => {}
        scheme => return Err(Error::InvalidUrl(format!("unsupported scheme: {scheme}"))),
    }
    if parsed.host_str().is_none() {
        return Err(Error::InvalidUrl(format!("{trimmed}: missing host")));
    }

    Ok(trimmed.to_string())
}

/// Partial settings change from the admin form. Absent fields keep their
/// current value.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct SettingsUpdate {
    /// New live domain, e.g. `https://example.com`.
    #[serde(default)]
    pub live_domain: Option<String>,
    /// New cache duration in seconds. Zero disables caching.
    #[serde(default)]
    pub cache_duration_seconds: Option<u64>,
}

/// Load settings from `store`, filling gaps with defaults derived from `home_url`.
///
/// # Errors
///
/// Returns an error if the store fails or a stored duration is not a number.
/// Returns `Error::InvalidUrl` if nothing is stored and no default can be
/// derived from `home_url`.
pub async fn load(store: &dyn OptionStore, home_url: &str) -> Result<Settings, Error> {
    Ok(Settings {
        live_domain: load_live_domain(store, home_url).await?,
        cache_duration_seconds: load_cache_duration(store).await?,
    })
}

/// Apply a partial change and persist the result.
///
/// Fields present in `update` are never read back from the store, so a
/// corrupt stored value can always be overwritten.
pub async fn update(store: &dyn OptionStore, home_url: &str, update: SettingsUpdate) -> Result<Settings, Error> {
    if update.live_domain.is_none() && update.cache_duration_seconds.is_none() {
        return Err(Error::InvalidInput(
            "At least one of live_domain or cache_duration_seconds must be specified".to_string(),
        ));
    }

    let live_domain = match update.live_domain {
        Some(live_domain) => live_domain,
        None => load_live_domain(store, home_url).await?,
    };
    let cache_duration_seconds = match update.cache_duration_seconds {
        Some(seconds) => seconds,
        None => load_cache_duration(store).await?,
    };

    save(store, Settings { live_domain, cache_duration_seconds }).await
}

pub(crate) async fn load_live_domain(store: &dyn OptionStore, home_url: &str) -> Result<String, Error> {
    match store.get_option(LIVE_DOMAIN_OPTION).await? {
        Some(value) => Ok(value),
        None => default_live_domain(home_url)
            .ok_or_else(|| Error::InvalidUrl(format!("cannot derive live domain from {home_url}"))),
    }
}

pub(crate) async fn load_cache_duration(store: &dyn OptionStore) -> Result<u64, Error> {
    match store.get_option(CACHE_DURATION_OPTION).await? {
        Some(value) => value.trim().parse().map_err(|e: std::num::ParseIntError| Error::CorruptOption {
            name: CACHE_DURATION_OPTION.into(),
            reason: e.to_string(),
        }),
        None => Ok(DEFAULT_CACHE_DURATION_SECS),
    }
}

/// Validate and persist settings, returning the stored values.
pub async fn save(store: &dyn OptionStore, settings: Settings) -> Result<Settings, Error> {
    let settings = settings.validate()?;

    store.set_option(LIVE_DOMAIN_OPTION, &settings.live_domain).await?;
    store
        .set_option(CACHE_DURATION_OPTION, &settings.cache_duration_seconds.to_string())
        .await?;

    tracing::info!(
        live_domain = %settings.live_domain,
        cache_duration_seconds = settings.cache_duration_seconds,
        "settings saved"
    );

    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::CacheDb;

    #[test]
    fn test_default_live_domain_swaps_tld() {
        assert_eq!(default_live_domain("https://example.test").as_deref(), Some("https://example.com"));
        assert_eq!(default_live_domain("http://shop.example.local/").as_deref(), Some("http://shop.example.com"));
    }

    #[test]
    fn test_default_live_domain_drops_port_and_path() {
        assert_eq!(default_live_domain("https://example.test:8443/blog").as_deref(), Some("https://example.com"));
    }

    #[test]
    fn test_default_live_domain_single_label() {
        assert_eq!(default_live_domain("http://localhost").as_deref(), Some("http://com"));
    }

    #[test]
    fn test_default_live_domain_unparseable() {
        assert!(default_live_domain("not a url").is_none());
        assert!(default_live_domain("mailto:someone@example.test").is_none());
    }

    #[test]
    fn test_cache_ttl() {
        let mut settings = Settings::defaults_for("https://example.test").unwrap();
        assert_eq!(settings.cache_ttl(), Some(Duration::from_secs(1800)));
        settings.cache_duration_seconds = 0;
        assert_eq!(settings.cache_ttl(), None);
    }

    #[test]
    fn test_validate_trims_trailing_slash() {
        let settings = Settings { live_domain: " https://example.com/ ".into(), cache_duration_seconds: 60 };
        assert_eq!(settings.validate().unwrap().live_domain, "https://example.com");
    }

    #[test]
    fn test_validate_rejects_bad_domains() {
        for bad in ["", "example.com", "ftp://example.com", "https://"] {
            let settings = Settings { live_domain: bad.into(), cache_duration_seconds: 60 };
            assert!(matches!(settings.validate(), Err(Error::InvalidUrl(_))), "accepted {bad:?}");
        }
    }

    #[test]
    fn test_validate_rejects_long_duration() {
        let settings =
            Settings { live_domain: "https://example.com".into(), cache_duration_seconds: MAX_CACHE_DURATION_SECS + 1 };
        assert!(matches!(settings.validate(), Err(Error::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_load_defaults() {
        let db = CacheDb::open_in_memory().await.unwrap();
        let settings = load(&db, "https://example.test").await.unwrap();
        assert_eq!(settings, Settings::defaults_for("https://example.test").unwrap());
    }

    #[tokio::test]
    async fn test_load_without_derivable_default() {
        let db = CacheDb::open_in_memory().await.unwrap();
        assert!(matches!(load(&db, "nope").await, Err(Error::InvalidUrl(_))));
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let db = CacheDb::open_in_memory().await.unwrap();
        let saved = save(&db, Settings { live_domain: "https://live.example.com/".into(), cache_duration_seconds: 60 })
            .await
            .unwrap();
        assert_eq!(saved.live_domain, "https://live.example.com");

        let loaded = load(&db, "https://example.test").await.unwrap();
        assert_eq!(loaded, saved);
    }

    #[tokio::test]
    async fn test_save_invalid_does_not_persist() {
        let db = CacheDb::open_in_memory().await.unwrap();
        let result = save(&db, Settings { live_domain: "nope".into(), cache_duration_seconds: 60 }).await;
        assert!(result.is_err());
        assert!(db.get_option(LIVE_DOMAIN_OPTION).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_load_corrupt_duration() {
        let db = CacheDb::open_in_memory().await.unwrap();
        db.set_option(CACHE_DURATION_OPTION, "soon").await.unwrap();
        assert!(matches!(load(&db, "https://example.test").await, Err(Error::CorruptOption { .. })));
    }

    #[tokio::test]
    async fn test_update_keeps_unspecified_fields() {
        let db = CacheDb::open_in_memory().await.unwrap();
        let update1 = SettingsUpdate { cache_duration_seconds: Some(120), ..Default::default() };
        let saved = update(&db, "https://example.test", update1).await.unwrap();
        assert_eq!(saved, Settings { live_domain: "https://example.com".into(), cache_duration_seconds: 120 });

        let update2 = SettingsUpdate { live_domain: Some("https://live.example.org".into()), ..Default::default() };
        let saved = update(&db, "https://example.test", update2).await.unwrap();
        assert_eq!(saved, Settings { live_domain: "https://live.example.org".into(), cache_duration_seconds: 120 });
    }

    #[tokio::test]
    async fn test_update_requires_a_field() {
        let db = CacheDb::open_in_memory().await.unwrap();
        let result = update(&db, "https://example.test", SettingsUpdate::default()).await;
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_update_overwrites_corrupt_duration() {
        let db = CacheDb::open_in_memory().await.unwrap();
        db.set_option(CACHE_DURATION_OPTION, "soon").await.unwrap();
        let saved = update(
            &db,
            "https://example.test",
            SettingsUpdate { cache_duration_seconds: Some(60), ..Default::default() },
        )
        .await
        .unwrap();
        assert_eq!(saved.cache_duration_seconds, 60);
    }
}
