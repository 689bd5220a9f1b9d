//! Session storage
//!
//! `Storage` forwards Get/Set/Delete/Reset/Close to a `RemoteStore`, applying
//! the key prefix and the default expiration. It holds no state of its own
//! besides the client handle, so it can be cloned and shared freely.

use crate::client::RemoteStore;
use crate::config::{Config, ResolvedConfig};
use crate::error::{Result, StartupError};
use bytes::Bytes;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Key-value storage backed by a remote store
#[derive(Clone)]
pub struct Storage {
    /// Client every command goes through
    db: Arc<dyn RemoteStore>,

    /// Expiration used by `set_default`
    expiration: Duration,

    /// Prepended to every key
    prefix: String,
}

impl Storage {
    /// Create a new storage, terminating the process if the store is unusable
    ///
    /// The store must answer a PING, and must accept a FLUSHDB when `reset`
    /// is set. Use `try_new` to handle those failures instead.
    pub async fn new(config: Config) -> Self {
        match Self::try_new(config).await {
            Ok(storage) => storage,
            Err(e) => {
                error!("Failed to initialize storage: {}", e);
                std::process::exit(1);
            }
        }
    }

    /// Create a new storage
    ///
    /// An error means no storage could be built; it is not worth retrying
    /// with the same configuration.
    pub async fn try_new(config: Config) -> std::result::Result<Self, StartupError> {
        Self::from_resolved(config.resolve()?).await
    }

    /// Create a new storage from an already resolved configuration
    pub async fn from_resolved(config: ResolvedConfig) -> std::result::Result<Self, StartupError> {
        let ResolvedConfig {
            client: db,
            expiration,
            prefix,
            reset,
        } = config;

        // Test connection
        db.ping().await.map_err(StartupError::Ping)?;

        // Flushes every key in the database, not only ours
        if reset {
            warn!("Resetting store: flushing the whole database");
            db.flush_db().await.map_err(StartupError::Reset)?;
        }

        info!(
            "Storage ready (prefix '{}', default expiration {:?})",
            prefix, expiration
        );

        Ok(Storage {
            db,
            expiration,
            prefix,
        })
    }

    /// Key prefix
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Expiration used by `set_default`
    pub fn expiration(&self) -> Duration {
        self.expiration
    }

    fn namespaced(&self, key: &str) -> String {
        format!("{}{}", self.prefix, key)
    }

    /// Get value by key
    ///
    /// Returns `Ok(None)` for an empty key and for a key that does not exist.
    pub async fn get(&self, key: &str) -> Result<Option<Bytes>> {
        if key.is_empty() {
            return Ok(None);
        }

        let key = self.namespaced(key);
        let value = self.db.get(&key).await?;
        debug!("GET {} -> {}", key, if value.is_some() { "hit" } else { "miss" });
        Ok(value)
    }

    /// Set key with value, expiring after `exp`
    ///
    /// An empty key or value is ignored. A zero `exp` stores the value
    /// without expiration.
    pub async fn set(&self, key: &str, value: &[u8], exp: Duration) -> Result<()> {
        if key.is_empty() || value.is_empty() {
            return Ok(());
        }

        let key = self.namespaced(key);
        let ttl = if exp.is_zero() { None } else { Some(exp) };
        debug!("SET {} ({} bytes, ttl {:?})", key, value.len(), ttl);
        self.db.set(&key, value, ttl).await
    }

    /// Set key with value, expiring after the configured expiration
    pub async fn set_default(&self, key: &str, value: &[u8]) -> Result<()> {
        self.set(key, value, self.expiration).await
    }

    /// Delete key
    ///
    /// An empty key is ignored; deleting a missing key succeeds.
    pub async fn delete(&self, key: &str) -> Result<()> {
        if key.is_empty() {
            return Ok(());
        }

        let key = self.namespaced(key);
        debug!("DEL {}", key);
        self.db.del(&key).await
    }

    /// Remove every key of the database, whatever its prefix
    pub async fn reset(&self) -> Result<()> {
        warn!("Resetting store: flushing the whole database");
        self.db.flush_db().await
    }

    /// Close the connection to the store
    ///
    /// Clones of this storage share the connection and are closed too.
    pub async fn close(&self) -> Result<()> {
        info!("Closing storage (prefix '{}')", self.prefix);
        self.db.close().await
    }
}

impl std::fmt::Debug for Storage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Storage")
            .field("prefix", &self.prefix)
            .field("expiration", &self.expiration)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::MemoryStore;

    async fn storage_on(store: &MemoryStore) -> Storage {
        Storage::try_new(Config::new().with_client(Arc::new(store.clone())))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_keys_are_prefixed_once() {
        let store = MemoryStore::new();
        let storage = storage_on(&store).await;

        storage.set("a", b"1", Duration::from_secs(60)).await.unwrap();
        storage.set_default("b", b"2").await.unwrap();

        assert_eq!(store.keys().await, vec!["sess:a".to_string(), "sess:b".to_string()]);
        assert_eq!(storage.get("b").await.unwrap(), Some(Bytes::from("2")));
    }

    #[tokio::test]
    async fn test_set_zero_ttl_never_expires() {
        let store = MemoryStore::new();
        let storage = storage_on(&store).await;

        storage.set("a", b"1", Duration::ZERO).await.unwrap();
        tokio::time::sleep(Duration::from_millis(10)).await;

        assert_eq!(storage.get("a").await.unwrap(), Some(Bytes::from("1")));
    }

    #[tokio::test]
    async fn test_accessors() {
        let storage = Storage::try_new(
            Config::new()
                .with_client(Arc::new(MemoryStore::new()))
                .with_prefix("app:")
                .with_expiration(Duration::from_secs(30)),
        )
        .await
        .unwrap();

        assert_eq!(storage.prefix(), "app:");
        assert_eq!(storage.expiration(), Duration::from_secs(30));
    }
}
