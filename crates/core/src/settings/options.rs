//! Named option persistence.

use async_trait::async_trait;
use chrono::Utc;
use tokio_rusqlite::params;
use tokio_rusqlite::rusqlite;

use crate::Error;
use crate::cache::CacheDb;

/// Process-wide key-value settings storage.
#[async_trait]
pub trait OptionStore: Send + Sync {
    async fn get_option(&self, name: &str) -> Result<Option<String>, Error>;

    async fn set_option(&self, name: &str, value: &str) -> Result<(), Error>;
}

impl CacheDb {
    /// Read a named option.
    pub async fn get_option(&self, name: &str) -> Result<Option<String>, Error> {
        let name = name.to_string();
        self.conn
            .call(move |conn| -> Result<Option<String>, Error> {
                let result =
                    conn.query_row("SELECT value FROM options WHERE name = ?1", params![name], |row| row.get(0));

                match result {
                    Ok(value) => Ok(Some(value)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(e.into()),
                }
            })
            .await
            .map_err(Error::from)
    }

    /// Insert or update a named option.
    pub async fn set_option(&self, name: &str, value: &str) -> Result<(), Error> {
        let name = name.to_string();
        let value = value.to_string();
        let updated_at = Utc::now().timestamp();
        self.conn
            .call(move |conn| -> Result<(), Error> {
                conn.execute(
                    "INSERT INTO options (name, value, updated_at) VALUES (?1, ?2, ?3)
                    ON CONFLICT(name) DO UPDATE SET
                        value = excluded.value,
                        updated_at = excluded.updated_at",
                    params![name, value, updated_at],
                )?;
                Ok(())
            })
            .await
            .map_err(Error::from)
    }
}

#[async_trait]
impl OptionStore for CacheDb {
    async fn get_option(&self, name: &str) -> Result<Option<String>, Error> {
        CacheDb::get_option(self, name).await
    }

    async fn set_option(&self, name: &str, value: &str) -> Result<(), Error> {
        CacheDb::set_option(self, name, value).await
    }
}
