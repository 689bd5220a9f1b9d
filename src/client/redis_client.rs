//! Redis client
//!
//! Thin wrapper over the `redis` crate. All commands share one multiplexed
//! connection, opened on first use. A command failing with an I/O error
//! discards that connection; the next command opens a new one.

use super::RemoteStore;
use crate::error::{Result, StoreError};
use async_trait::async_trait;
use bytes::Bytes;
use redis::aio::MultiplexedConnection;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Address of a Redis server on the local host, standard port
pub const DEFAULT_URL: &str = "redis://127.0.0.1:6379/";

/// Connection slot
enum State {
    /// Not connected yet
    Idle,
    /// Connected
    Open(MultiplexedConnection),
    /// `close` was called
    Closed,
}

/// `RemoteStore` backed by a Redis server
pub struct RedisClient {
    /// The client (holds the parsed URL, performs no I/O by itself)
    client: redis::Client,

    /// Shared connection
    state: Mutex<State>,
}

impl RedisClient {
    /// Create a client for the given URL (`redis://host:port/db`)
    ///
    /// No connection is made until the first command.
    pub fn open(url: &str) -> Result<Self> {
        let client = redis::Client::open(url)?;
        Ok(RedisClient {
            client,
            state: Mutex::new(State::Idle),
        })
    }

    /// Create a client for a Redis server on 127.0.0.1:6379
    pub fn local() -> Result<Self> {
        Self::open(DEFAULT_URL)
    }

    /// Server address (`host:port`)
    pub fn addr(&self) -> String {
        self.client.get_connection_info().addr.to_string()
    }

    /// Get a handle on the shared connection, connecting if needed
    async fn connection(&self) -> Result<MultiplexedConnection> {
        let mut state = self.state.lock().await;
        match &*state {
            State::Open(conn) => Ok(conn.clone()),
            State::Closed => Err(StoreError::Closed),
            State::Idle => {
                let conn = self.client.get_multiplexed_tokio_connection().await?;
                info!("Connected to {}", self.addr());
                *state = State::Open(conn.clone());
                Ok(conn)
            }
        }
    }

    /// Forget a broken connection so the next command reconnects
    async fn discard_connection(&self) {
        let mut state = self.state.lock().await;
        if let State::Open(_) = &*state {
            *state = State::Idle;
        }
    }

    /// Send a command on the shared connection
    async fn query<T: redis::FromRedisValue>(&self, cmd: &redis::Cmd) -> Result<T> {
        let mut conn = self.connection().await?;
        match cmd.query_async(&mut conn).await {
            Ok(value) => Ok(value),
            Err(e) => {
                if e.is_io_error() || e.is_connection_dropped() {
                    warn!("Connection to {} lost: {}", self.addr(), e);
                    self.discard_connection().await;
                }
                Err(e.into())
            }
        }
    }
}

/// Millisecond expiry for a SET ... PX, at least 1ms
fn expiry_millis(ttl: Duration) -> u64 {
    let ms = ttl.as_millis().min(u64::MAX as u128) as u64;
    ms.max(1)
}

#[async_trait]
impl RemoteStore for RedisClient {
    async fn ping(&self) -> Result<()> {
        let pong: String = self.query(&redis::cmd("PING")).await?;
        debug!("PING -> {}", pong);
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<Bytes>> {
        let value: Option<Vec<u8>> = self.query(redis::cmd("GET").arg(key)).await?;
        Ok(value.map(Bytes::from))
    }

    async fn set(&self, key: &str, value: &[u8], ttl: Option<Duration>) -> Result<()> {
        let mut cmd = redis::cmd("SET");
        cmd.arg(key).arg(value);
        if let Some(ttl) = ttl {
            cmd.arg("PX").arg(expiry_millis(ttl));
        }
        self.query::<()>(&cmd).await
    }

    async fn del(&self, key: &str) -> Result<()> {
        let removed: i64 = self.query(redis::cmd("DEL").arg(key)).await?;
        debug!("DEL {} removed {} key(s)", key, removed);
        Ok(())
    }

    async fn flush_db(&self) -> Result<()> {
        self.query::<()>(&redis::cmd("FLUSHDB")).await
    }

    async fn close(&self) -> Result<()> {
        let mut state = self.state.lock().await;
        match std::mem::replace(&mut *state, State::Closed) {
            State::Closed => Err(StoreError::Closed),
            State::Idle | State::Open(_) => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expiry_millis() {
        assert_eq!(expiry_millis(Duration::from_secs(3600)), 3_600_000);
        assert_eq!(expiry_millis(Duration::from_millis(1)), 1);
        assert_eq!(expiry_millis(Duration::from_micros(10)), 1);
    }

    #[test]
    fn test_open_invalid_url() {
        assert!(matches!(
            RedisClient::open("not a url"),
            Err(StoreError::Redis(_))
        ));
    }

    #[test]
    fn test_local_targets_default_port() {
        let client = RedisClient::local().unwrap();
        assert_eq!(client.addr(), "127.0.0.1:6379");
    }

    #[tokio::test]
    async fn test_close_before_connect() {
        let client = RedisClient::local().unwrap();

        client.close().await.unwrap();

        assert!(matches!(client.ping().await, Err(StoreError::Closed)));
        assert!(matches!(client.close().await, Err(StoreError::Closed)));
    }
}
