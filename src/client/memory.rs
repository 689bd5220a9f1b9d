//! In-memory remote store
//!
//! Behaves like a single Redis database: last-writer-wins `set`, lazy
//! expiration on access, `flush_db` wiping every key regardless of prefix.
//! Clones share the same data, so several `Storage` instances can be pointed
//! at one store.

use super::entry::Entry;
use super::RemoteStore;
use crate::error::{Result, StoreError};
use async_trait::async_trait;
use bytes::Bytes;
use siphasher::sip::SipHasher13;
use std::collections::HashMap;
use std::hash::BuildHasherDefault;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::trace;

/// Type alias for our hash map with SipHasher
type StoreMap = HashMap<String, Entry, BuildHasherDefault<SipHasher13>>;

/// In-memory key-value store implementing `RemoteStore`
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Inner>,
}

#[derive(Default)]
struct Inner {
    map: Mutex<StoreMap>,
    closed: AtomicBool,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live (non-expired) keys
    pub async fn len(&self) -> usize {
        let map = self.inner.map.lock().await;
        map.values().filter(|entry| !entry.is_expired()).count()
    }

    /// Check if the store holds no live key
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Live keys, sorted
    pub async fn keys(&self) -> Vec<String> {
        let map = self.inner.map.lock().await;
        let mut keys: Vec<String> = map
            .iter()
            .filter(|(_, entry)| !entry.is_expired())
            .map(|(key, _)| key.clone())
            .collect();
        keys.sort();
        keys
    }

    fn ensure_open(&self) -> Result<()> {
        if self.inner.closed.load(Ordering::Acquire) {
            return Err(StoreError::Closed);
        }
        Ok(())
    }
}

#[async_trait]
impl RemoteStore for MemoryStore {
    async fn ping(&self) -> Result<()> {
        self.ensure_open()
    }

    async fn get(&self, key: &str) -> Result<Option<Bytes>> {
        self.ensure_open()?;
        let mut map = self.inner.map.lock().await;

        let is_expired = map.get(key).map(|entry| entry.is_expired()).unwrap_or(false);
        if is_expired {
            trace!("Evicting expired key {}", key);
            map.remove(key);
            return Ok(None);
        }

        Ok(map.get(key).map(|entry| entry.value.clone()))
    }

    async fn set(&self, key: &str, value: &[u8], ttl: Option<Duration>) -> Result<()> {
        self.ensure_open()?;
        let entry = Entry::new(Bytes::copy_from_slice(value), ttl);
        self.inner.map.lock().await.insert(key.to_string(), entry);
        Ok(())
    }

    async fn del(&self, key: &str) -> Result<()> {
        self.ensure_open()?;
        self.inner.map.lock().await.remove(key);
        Ok(())
    }

    async fn flush_db(&self) -> Result<()> {
        self.ensure_open()?;
        self.inner.map.lock().await.clear();
        Ok(())
    }

    async fn close(&self) -> Result<()> {
        if self.inner.closed.swap(true, Ordering::AcqRel) {
            return Err(StoreError::Closed);
        }
        Ok(())
    }
}
