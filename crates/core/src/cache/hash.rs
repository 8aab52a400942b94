//! Content-addressed cache key generation.

use sha2::{Digest, Sha256};

/// Naming convention shared by every rewrite transient.
///
/// The cache invalidator only touches keys carrying this prefix.
pub const CACHE_KEY_PREFIX: &str = "redirect_uploads_";

/// Compute the transient key for a piece of raw content.
pub fn compute_content_key(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    format!("{CACHE_KEY_PREFIX}{}", hex::encode(hasher.finalize()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_stability() {
        let key1 = compute_content_key("<img src=\"a.jpg\">");
        let key2 = compute_content_key("<img src=\"a.jpg\">");
        assert_eq!(key1, key2);
    }

    #[test]
    fn test_hash_different_content() {
        assert_ne!(compute_content_key("a"), compute_content_key("b"));
    }

    #[test]
    fn test_key_format() {
        let key = compute_content_key("");
        let digest = key.strip_prefix(CACHE_KEY_PREFIX).unwrap();
        assert_eq!(digest.len(), 64);
        assert!(digest.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
