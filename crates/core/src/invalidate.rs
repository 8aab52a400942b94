//! Cache invalidation for the admin "clear cache" action.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::Error;
use crate::cache::TransientStore;
use crate::cache::hash::CACHE_KEY_PREFIX;

/// Outcome of a cache clear.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ClearReport {
    /// Entries removed.
    pub deleted: u64,
    /// Entries whose deletion failed and were left in place.
    pub failed: u64,
}

/// Delete every rewrite transient in `store`.
///
/// Deletion is best-effort per entry: one failing key does not stop the rest.
///
/// # Errors
///
/// Returns an error only if the keys cannot be enumerated.
pub async fn clear_cache(store: &dyn TransientStore) -> Result<ClearReport, Error> {
    let keys = store.keys_with_prefix(CACHE_KEY_PREFIX).await?;
    let mut report = ClearReport::default();

    for key in &keys {
        match store.delete(key).await {
            Ok(true) => report.deleted += 1,
            Ok(false) => {}
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "failed to delete cached rewrite");
                report.failed += 1;
            }
        }
    }

    tracing::info!(deleted = report.deleted, failed = report.failed, "rewrite cache cleared");

    Ok(report)
}
