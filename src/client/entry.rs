//! Entry held by the in-memory store

use bytes::Bytes;
use std::time::{Duration, Instant};

/// A single value with its optional deadline
#[derive(Debug, Clone)]
pub(crate) struct Entry {
    /// The value
    pub value: Bytes,

    /// Optional expiration time (absolute)
    pub expire_at: Option<Instant>,
}

impl Entry {
    /// Create a new entry, expiring after `ttl` if one is given
    pub fn new(value: Bytes, ttl: Option<Duration>) -> Self {
        Entry {
            value,
            expire_at: ttl.map(|ttl| Instant::now() + ttl),
        }
    }

    /// Check if the entry has expired
    pub fn is_expired(&self) -> bool {
        match self.expire_at {
            Some(expire_at) => Instant::now() >= expire_at,
            None => false,
        }
    }
}
