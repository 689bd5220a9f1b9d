//! Remote store clients
//!
//! `Storage` never talks to a server directly. Every command goes through the
//! `RemoteStore` trait, so the backing store can be swapped without touching
//! the adapter (a Redis server in production, the in-memory store in tests).

mod entry;
mod memory;
mod redis_client;

pub use memory::MemoryStore;
pub use redis_client::{RedisClient, DEFAULT_URL};

use crate::error::Result;
use async_trait::async_trait;
use bytes::Bytes;
use std::time::Duration;

/// Client for a remote key-value server
///
/// Keys reach the client already namespaced. Implementations must be safe to
/// share between tasks: a single client backs every clone of a `Storage`.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Liveness check (PING)
    async fn ping(&self) -> Result<()>;

    /// Fetch a value, `Ok(None)` when the key does not exist or has expired
    async fn get(&self, key: &str) -> Result<Option<Bytes>>;

    /// Store a value, overwriting any previous one
    ///
    /// `ttl: None` stores the value without expiration.
    async fn set(&self, key: &str, value: &[u8], ttl: Option<Duration>) -> Result<()>;

    /// Remove a key. Removing a missing key succeeds.
    async fn del(&self, key: &str) -> Result<()>;

    /// Remove every key of the current database (FLUSHDB)
    async fn flush_db(&self) -> Result<()>;

    /// Release the connection
    async fn close(&self) -> Result<()>;
}
