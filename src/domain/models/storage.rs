use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;

/// Durable string key/value storage that survives restarts, the terminal
/// counterpart of a browser's per-origin local storage.
#[async_trait]
pub trait Storage {
    /// Returns `None` when nothing is stored under the key.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    async fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Removing a missing key is not an error.
    async fn remove(&self, key: &str) -> Result<()>;
}

pub type StorageBox = Arc<dyn Storage + Send + Sync>;
