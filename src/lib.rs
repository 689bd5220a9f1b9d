//! FerrumStorage - key-value session storage backed by a Redis-compatible server
//!
//! The storage itself is a thin layer: every operation is forwarded to a
//! remote store client after prefixing the key.
//! - `config`: configuration and defaults
//! - `client`: the `RemoteStore` seam, with a Redis client and an in-memory store
//! - `storage`: the Get/Set/Delete/Reset/Close adapter
//!
//! ```no_run
//! use ferrum_storage::{Config, Storage};
//! use std::time::Duration;
//!
//! # async fn example() -> ferrum_storage::Result<()> {
//! let storage = Storage::new(Config::new().with_prefix("app:")).await;
//!
//! storage.set("token", b"abc", Duration::from_secs(3600)).await?;
//! assert_eq!(storage.get("token").await?.as_deref(), Some(&b"abc"[..]));
//!
//! storage.close().await?;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod storage;

/// Re-export commonly used types
pub use client::{MemoryStore, RedisClient, RemoteStore};
pub use config::{Config, ResolvedConfig, DEFAULT_EXPIRATION, DEFAULT_PREFIX};
pub use error::{Result, StartupError, StoreError};
pub use storage::Storage;
