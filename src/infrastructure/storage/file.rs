#[cfg(test)]
#[path = "file_test.rs"]
mod tests;

use std::path;

use anyhow::bail;
use anyhow::Result;
use async_trait::async_trait;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::Storage;

/// Stores each key as its own file inside the data directory.
pub struct FileStorage {
    pub data_dir: path::PathBuf,
}

impl Default for FileStorage {
    fn default() -> FileStorage {
        return FileStorage::new(path::PathBuf::from(Config::get(ConfigKey::DataDir)));
    }
}

impl FileStorage {
    pub fn new(data_dir: path::PathBuf) -> FileStorage {
        return FileStorage { data_dir };
    }

    fn get_file_path(&self, key: &str) -> Result<path::PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| return c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            bail!(format!("Invalid storage key '{key}'"));
        }

        return Ok(self.data_dir.join(key));
    }
}

#[async_trait]
impl Storage for FileStorage {
    #[allow(clippy::implicit_return)]
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let file_path = self.get_file_path(key)?;
        if !file_path.exists() {
            return Ok(None);
        }

        let payload = fs::read_to_string(file_path).await?;
        return Ok(Some(payload));
    }

    #[allow(clippy::implicit_return)]
    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let file_path = self.get_file_path(key)?;
        if !self.data_dir.exists() {
            fs::create_dir_all(&self.data_dir).await?;
        }

        let mut file = fs::File::create(file_path).await?;
        file.write_all(value.as_bytes()).await?;
        file.flush().await?;

        tracing::debug!(key = key, "Stored value");
        return Ok(());
    }

    #[allow(clippy::implicit_return)]
    async fn remove(&self, key: &str) -> Result<()> {
        let file_path = self.get_file_path(key)?;
        if !file_path.exists() {
            return Ok(());
        }

        fs::remove_file(file_path).await?;
        tracing::debug!(key = key, "Removed value");
        return Ok(());
    }
}
