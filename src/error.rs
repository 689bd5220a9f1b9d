//! Error types
//!
//! Two families: `StoreError` for per-operation failures reported by the
//! remote store, and `StartupError` for failures that leave no usable
//! storage behind.

use std::fmt;

/// Result alias for storage operations
pub type Result<T> = std::result::Result<T, StoreError>;

/// Failure reported by a remote store client
#[derive(Debug)]
pub enum StoreError {
    /// The client was closed, no further commands are accepted
    Closed,

    /// Error returned by the Redis client (I/O, protocol or server reply)
    Redis(redis::RedisError),

    /// Error returned by any other client implementation
    Backend(String),
}

impl StoreError {
    /// Create a backend error from any message
    pub fn backend(msg: impl Into<String>) -> Self {
        StoreError::Backend(msg.into())
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Closed => write!(f, "client is closed"),
            StoreError::Redis(e) => write!(f, "redis error: {}", e),
            StoreError::Backend(msg) => write!(f, "backend error: {}", msg),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::Redis(e) => Some(e),
            _ => None,
        }
    }
}

impl From<redis::RedisError> for StoreError {
    fn from(e: redis::RedisError) -> Self {
        StoreError::Redis(e)
    }
}

/// Unrecoverable failure while building a `Storage`
///
/// No storage instance exists when one of these is returned.
#[derive(Debug)]
pub enum StartupError {
    /// The configured URL could not be turned into a client
    InvalidUrl(String, StoreError),

    /// The store did not answer PING
    Ping(StoreError),

    /// Flushing the database on startup failed
    Reset(StoreError),
}

impl fmt::Display for StartupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StartupError::InvalidUrl(url, e) => write!(f, "invalid store url '{}': {}", url, e),
            StartupError::Ping(e) => write!(f, "store is unreachable: {}", e),
            StartupError::Reset(e) => write!(f, "failed to reset store: {}", e),
        }
    }
}

impl std::error::Error for StartupError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StartupError::InvalidUrl(_, e) | StartupError::Ping(e) | StartupError::Reset(e) => {
                Some(e)
            }
        }
    }
}
