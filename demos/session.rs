use anyhow::Context;
use ferrum_storage::{Config, MemoryStore, Storage};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

// REDIS_URL=redis://127.0.0.1:6379/ cargo run --example session

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::DEBUG.into()),
        )
        .init();

    // Without REDIS_URL, run against the in-memory store
    let config = match std::env::var("REDIS_URL") {
        Ok(url) => Config::new().with_url(url),
        Err(_) => {
            info!("REDIS_URL not set, using in-memory store");
            Config::new().with_client(Arc::new(MemoryStore::new()))
        }
    };

    let storage = Storage::new(config.with_prefix("demo:")).await;

    storage
        .set("session-1", b"{\"user\":42}", Duration::from_secs(60))
        .await
        .context("storing session-1")?;
    storage
        .set_default("session-2", b"{\"user\":7}")
        .await
        .context("storing session-2")?;

    for key in ["session-1", "session-2", "session-3"] {
        match storage.get(key).await? {
            Some(value) => info!("{} = {}", key, String::from_utf8_lossy(&value)),
            None => info!("{} not found", key),
        }
    }

    storage.delete("session-1").await?;
    storage.close().await?;

    Ok(())
}
