//! Transient CRUD operations.
//!
//! Provides the SQLite implementation of [`TransientStore`] plus
//! housekeeping for expired rows.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use tokio_rusqlite::params;
use tokio_rusqlite::rusqlite;

use super::connection::CacheDb;
use super::store::TransientStore;
use crate::Error;

impl CacheDb {
    /// Get a transient value by key if it has not expired.
    pub async fn get_transient(&self, key: &str) -> Result<Option<String>, Error> {
        let key = key.to_string();
        let now = Utc::now().timestamp();
        self.conn
            .call(move |conn| -> Result<Option<String>, Error> {
                let result = conn.query_row(
                    "SELECT value FROM transients
                    WHERE key = ?1 AND (expires_at IS NULL OR expires_at > ?2)",
                    params![key, now],
                    |row| row.get(0),
                );

                match result {
                    Ok(value) => Ok(Some(value)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(e.into()),
                }
            })
            .await
            .map_err(Error::from)
    }

    /// Insert or update a transient.
    ///
    /// Uses UPSERT semantics so concurrent writers of the same key end with
    /// the last write.
    pub async fn put_transient(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<(), Error> {
        let key = key.to_string();
        let value = value.to_string();
        let created_at = Utc::now().timestamp();
        let expires_at = ttl.map(|ttl| created_at.saturating_add(i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX)));

        self.conn
            .call(move |conn| -> Result<(), Error> {
                conn.execute(
                    "INSERT INTO transients (key, value, created_at, expires_at)
                    VALUES (?1, ?2, ?3, ?4)
                    ON CONFLICT(key) DO UPDATE SET
                        value = excluded.value,
                        created_at = excluded.created_at,
                        expires_at = excluded.expires_at",
                    params![key, value, created_at, expires_at],
                )?;
                Ok(())
            })
            .await
            .map_err(Error::from)
    }

    /// Delete a transient by key.
    pub async fn delete_transient(&self, key: &str) -> Result<bool, Error> {
        let key = key.to_string();
        self.conn
            .call(move |conn| -> Result<bool, Error> {
                let count = conn.execute("DELETE FROM transients WHERE key = ?1", params![key])?;
                Ok(count > 0)
            })
            .await
            .map_err(Error::from)
    }

    /// List transient keys starting with `prefix`.
    pub async fn transient_keys(&self, prefix: &str) -> Result<Vec<String>, Error> {
        let prefix = prefix.to_string();
        self.conn
            .call(move |conn| -> Result<Vec<String>, Error> {
                let mut stmt = conn.prepare("SELECT key FROM transients WHERE substr(key, 1, ?2) = ?1 ORDER BY key")?;
                let rows = stmt.query_map(params![prefix, prefix.chars().count() as i64], |row| row.get(0))?;
                let keys = rows.collect::<Result<Vec<String>, _>>()?;
                Ok(keys)
            })
            .await
            .map_err(Error::from)
    }

    /// Delete expired transients.
    ///
    /// Returns the number of deleted entries.
    pub async fn purge_expired_transients(&self) -> Result<u64, Error> {
        let now = Utc::now().timestamp();
        self.conn
            .call(move |conn| -> Result<u64, Error> {
                let count = conn.execute(
                    "DELETE FROM transients WHERE expires_at IS NOT NULL AND expires_at <= ?1",
                    params![now],
                )?;
                Ok(count as u64)
            })
            .await
            .map_err(Error::from)
    }
}

#[async_trait]
impl TransientStore for CacheDb {
    async fn get(&self, key: &str) -> Result<Option<String>, Error> {
        self.get_transient(key).await
    }

    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<(), Error> {
        self.put_transient(key, value, ttl).await
    }

    async fn delete(&self, key: &str) -> Result<bool, Error> {
        self.delete_transient(key).await
    }

    async fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>, Error> {
        self.transient_keys(prefix).await
    }
}
