//! Upload URL rewriting.
//!
//! Upload URLs pointing at the local site are redirected to the live domain
//! unless the file exists locally. Results are cached per input content for
//! the configured duration.
//!
//! The rewriter never fails a request:
//! - no parseable home URL: content passes through unmodified
//! - cache or settings store down: recompute, fall back to defaults
//! - existence check errors: the file counts as missing

pub mod probe;
pub mod uploads;

use std::borrow::Cow;
use std::sync::Arc;

use crate::cache::hash::compute_content_key;
use crate::cache::{CacheDb, TransientStore};
use crate::config::AppConfig;
use crate::invalidate::{self, ClearReport};
use crate::settings::{self, OptionStore, Settings, SettingsUpdate};
use crate::Error;

pub use probe::{FileProbe, LocalFiles};
pub use uploads::{Candidate, UploadsBase, local_path};

/// Result of a single uncached pass over some content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewritten<'a> {
    pub content: Cow<'a, str>,
    /// Upload URLs found.
    pub candidates: usize,
    /// Upload URLs pointed at the live domain.
    pub redirected: usize,
}

/// Rewrites local upload URLs to the live domain.
///
/// Holds explicit handles to every collaborator: the filesystem probe, the
/// transient cache and the option store.
#[derive(Clone)]
pub struct Rewriter {
    home_url: String,
    base: Option<UploadsBase>,
    probe: Arc<dyn FileProbe>,
    cache: Arc<dyn TransientStore>,
    options: Arc<dyn OptionStore>,
}

impl Rewriter {
    pub fn new(
        config: &AppConfig, probe: Arc<dyn FileProbe>, cache: Arc<dyn TransientStore>, options: Arc<dyn OptionStore>,
    ) -> Self {
        let base = UploadsBase::parse(&config.home_url, config.uploads_path_trimmed());
        match &base {
            Some(base) => tracing::debug!(base_url = %base.base_url(), "uploads base resolved"),
            None => tracing::warn!(home_url = %config.home_url, "cannot parse home_url, rewriting disabled"),
        }

        Self { home_url: config.home_url.clone(), base, probe, cache, options }
    }

    /// Rewriter over the real uploads directory, using `db` for both the
    /// cache and the settings.
    pub fn with_db(config: &AppConfig, db: CacheDb) -> Self {
        let db = Arc::new(db);
        Self::new(config, Arc::new(LocalFiles::new(&config.uploads_dir)), db.clone(), db)
    }

    /// The uploads base, if the home URL could be parsed.
    pub fn base(&self) -> Option<&UploadsBase> {
        self.base.as_ref()
    }

    /// Rewrite every upload URL in `content`.
    ///
    /// Serves a cached result when one exists for identical content.
    pub async fn rewrite(&self, content: &str) -> String {
        let Some(base) = &self.base else {
            return content.to_string();
        };
        let Some(settings) = self.current_settings().await else {
            return content.to_string();
        };

        let ttl = settings.cache_ttl();
        let key = compute_content_key(content);

        if ttl.is_some() {
            match self.cache.get(&key).await {
                Ok(Some(cached)) => {
                    tracing::debug!(key = %key, "rewrite cache hit");
                    return cached;
                }
                Ok(None) => tracing::debug!(key = %key, "rewrite cache miss"),
                Err(e) => tracing::warn!(error = %e, "rewrite cache unavailable, recomputing"),
            }
        }

        let rewritten = self.rewrite_with(base, content, &settings.live_domain);
        tracing::debug!(
            candidates = rewritten.candidates,
            redirected = rewritten.redirected,
            "rewrote upload urls"
        );
        let output = rewritten.content.into_owned();

        if ttl.is_some() {
            if let Err(e) = self.cache.set(&key, &output, ttl).await {
                tracing::warn!(error = %e, "failed to store rewrite result");
            }
        }

        output
    }

    /// Rewrite a single attachment URL.
    ///
    /// Same semantics as [`Rewriter::rewrite`]; the URL is just very short content.
    pub async fn rewrite_attachment_url(&self, url: &str) -> String {
        self.rewrite(url).await
    }

    /// One pass over `content` without touching the cache.
    pub fn rewrite_with<'a>(&self, base: &UploadsBase, content: &'a str, live_domain: &str) -> Rewritten<'a> {
        let live_prefix = format!("{}/{}/", live_domain.trim_end_matches('/'), base.uploads_path());
        let mut output = String::new();
        let mut last = 0;
        let mut candidates = 0;
        let mut redirected = 0;

        for candidate in base.candidates(content) {
            candidates += 1;
            if self.exists_locally(candidate.suffix) {
                continue;
            }

            if output.is_empty() {
                output.reserve(content.len());
            }
            output.push_str(&content[last..candidate.start]);
            output.push_str(&live_prefix);
            output.push_str(candidate.suffix);
            last = candidate.end;
            redirected += 1;
        }

        if redirected == 0 {
            return Rewritten { content: Cow::Borrowed(content), candidates, redirected };
        }

        output.push_str(&content[last..]);
        Rewritten { content: Cow::Owned(output), candidates, redirected }
    }

    /// Delete every cached rewrite.
    pub async fn clear_cache(&self) -> Result<ClearReport, Error> {
        invalidate::clear_cache(self.cache.as_ref()).await
    }

    /// Settings currently in effect.
    pub async fn settings(&self) -> Result<Settings, Error> {
        settings::load(self.options.as_ref(), &self.home_url).await
    }

    /// Apply a settings change from the admin surface.
    ///
    /// Cached rewrites are left alone; clearing them is a separate action.
    pub async fn update_settings(&self, update: SettingsUpdate) -> Result<Settings, Error> {
        settings::update(self.options.as_ref(), &self.home_url, update).await
    }

    fn exists_locally(&self, suffix: &str) -> bool {
        local_path(self.probe.root(), suffix).is_some_and(|path| self.probe.exists(&path))
    }

    /// Settings for a page request. Each value that cannot be read falls back
    /// to its default on its own, so a bad duration keeps the stored domain.
    async fn current_settings(&self) -> Option<Settings> {
        let store = self.options.as_ref();
        let live_domain = match settings::load_live_domain(store, &self.home_url).await {
            Ok(live_domain) => live_domain,
            Err(e) => {
                tracing::warn!(error = %e, "live domain unavailable, using default");
                settings::default_live_domain(&self.home_url)?
            }
        };
        let cache_duration_seconds = match settings::load_cache_duration(store).await {
            Ok(seconds) => seconds,
            Err(e) => {
                tracing::warn!(error = %e, "cache duration unavailable, using default");
                settings::DEFAULT_CACHE_DURATION_SECS
            }
        };

        Some(Settings { live_domain, cache_duration_seconds })
    }
}
