use anyhow::Result;
use async_trait::async_trait;
use dashmap::DashMap;

use crate::domain::models::Storage;

#[derive(Default)]
pub struct MemoryStorage {
    values: DashMap<String, String>,
}

#[async_trait]
impl Storage for MemoryStorage {
    #[allow(clippy::implicit_return)]
    async fn get(&self, key: &str) -> Result<Option<String>> {
        return Ok(self.values.get(key).map(|val| return val.to_string()));
    }

    #[allow(clippy::implicit_return)]
    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        return Ok(());
    }

    #[allow(clippy::implicit_return)]
    async fn remove(&self, key: &str) -> Result<()> {
        self.values.remove(key);
        return Ok(());
    }
}
