//! Storage configuration
//!
//! `Config` may be partially filled in. `Config::resolve` substitutes the
//! defaults and produces the `ResolvedConfig` that `Storage` is built from.

use crate::client::{RedisClient, RemoteStore, DEFAULT_URL};
use crate::error::StartupError;
use serde::Deserialize;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Default expiration: 7 days
pub const DEFAULT_EXPIRATION: Duration = Duration::from_secs(60 * 60 * 24 * 7);

/// Default key prefix
pub const DEFAULT_PREFIX: &str = "sess:";

/// Storage configuration
#[derive(Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Pre-built client. When unset, a Redis client is created from `url`.
    #[serde(skip)]
    pub client: Option<Arc<dyn RemoteStore>>,

    /// Redis URL used when no client is given (default: 127.0.0.1:6379)
    pub url: Option<String>,

    /// Expiration used by `set_default` (zero means 7 days)
    pub expiration: Duration,

    /// Prepended to every key (empty means `"sess:"`)
    pub prefix: String,

    /// Not used by any operation
    pub secret: String,

    /// Flush the whole database when the storage is created
    pub reset: bool,
}

impl Config {
    /// Create an empty configuration (every field defaulted on resolve)
    pub fn new() -> Self {
        Self::default()
    }

    /// Use an existing client
    pub fn with_client(mut self, client: Arc<dyn RemoteStore>) -> Self {
        self.client = Some(client);
        self
    }

    /// Connect to the given Redis URL
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Set the default expiration
    pub fn with_expiration(mut self, expiration: Duration) -> Self {
        self.expiration = expiration;
        self
    }

    /// Set the key prefix
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Set the secret
    pub fn with_secret(mut self, secret: impl Into<String>) -> Self {
        self.secret = secret.into();
        self
    }

    /// Flush the database on creation
    pub fn with_reset(mut self, reset: bool) -> Self {
        self.reset = reset;
        self
    }

    /// Fill in the defaults
    ///
    /// Performs no I/O: a default client only connects on its first command.
    pub fn resolve(self) -> Result<ResolvedConfig, StartupError> {
        let client = match self.client {
            Some(client) => client,
            None => {
                let client = match self.url.as_deref() {
                    Some(url) => RedisClient::open(url)
                        .map_err(|e| StartupError::InvalidUrl(url.to_string(), e))?,
                    None => RedisClient::local()
                        .map_err(|e| StartupError::InvalidUrl(DEFAULT_URL.to_string(), e))?,
                };
                Arc::new(client) as Arc<dyn RemoteStore>
            }
        };

        let expiration = if self.expiration.is_zero() {
            DEFAULT_EXPIRATION
        } else {
            self.expiration
        };

        let prefix = if self.prefix.is_empty() {
            DEFAULT_PREFIX.to_string()
        } else {
            self.prefix
        };

        Ok(ResolvedConfig {
            client,
            expiration,
            prefix,
            reset: self.reset,
        })
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("client", &self.client.as_ref().map(|_| "<client>"))
            .field("url", &self.url)
            .field("expiration", &self.expiration)
            .field("prefix", &self.prefix)
            .field("secret", &"<redacted>")
            .field("reset", &self.reset)
            .finish()
    }
}

/// Configuration with every default applied
#[derive(Clone)]
pub struct ResolvedConfig {
    /// Client all commands go through
    pub client: Arc<dyn RemoteStore>,

    /// Default expiration, never zero
    pub expiration: Duration,

    /// Key prefix, never empty
    pub prefix: String,

    /// Flush the whole database on creation
    pub reset: bool,
}
