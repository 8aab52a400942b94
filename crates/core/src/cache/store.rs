//! Storage seam for time-limited rewrite results.

use std::time::Duration;

use async_trait::async_trait;

use crate::Error;

/// Key-value store with per-key expiry.
///
/// Expired entries must never be returned from [`TransientStore::get`], even
/// if they have not been physically removed yet.
#[async_trait]
pub trait TransientStore: Send + Sync {
    /// Fetch an unexpired value.
    async fn get(&self, key: &str) -> Result<Option<String>, Error>;

    /// Insert or replace a value. `None` means the entry never expires.
    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<(), Error>;

    /// Delete a single entry, returning whether it existed.
    async fn delete(&self, key: &str) -> Result<bool, Error>;

    /// List every stored key (expired or not) that starts with `prefix`.
    async fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>, Error>;
}
