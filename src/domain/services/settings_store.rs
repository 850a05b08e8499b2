#[cfg(test)]
#[path = "settings_store_test.rs"]
mod tests;

use anyhow::Result;
use tokio::sync::RwLock;

use crate::domain::models::RequestConfig;
use crate::domain::models::SettingKey;
use crate::domain::models::StorageBox;

pub const SETTINGS_KEY: &str = "art_spark_settings";

/// Owns the user's `RequestConfig`. The gateway only ever reads snapshots.
pub struct SettingsStore {
    storage: StorageBox,
    config: RwLock<RequestConfig>,
}

impl SettingsStore {
    pub async fn hydrate(storage: StorageBox) -> Result<SettingsStore> {
        let stored = match storage.get(SETTINGS_KEY).await {
            Ok(stored) => stored,
            Err(err) => {
                tracing::warn!(error = ?err, "Stored settings are unreadable, discarding them");
                storage.remove(SETTINGS_KEY).await?;
                None
            }
        };

        let mut config = RequestConfig::default();
        if let Some(payload) = stored {
            match serde_json::from_str::<RequestConfig>(&payload) {
                Ok(stored) => config = stored,
                Err(err) => {
                    tracing::warn!(error = ?err, "Stored settings are unreadable, using defaults");
                }
            }
        }

        return Ok(SettingsStore {
            storage,
            config: RwLock::new(config),
        });
    }

    pub async fn snapshot(&self) -> RequestConfig {
        return self.config.read().await.clone();
    }

    pub async fn set(&self, key: SettingKey, value: &str) -> Result<RequestConfig> {
        let mut config = self.config.write().await;
        let mut updated = config.clone();
        updated.set(key, value)?;

        self.storage
            .set(SETTINGS_KEY, &serde_json::to_string(&updated)?)
            .await?;
        *config = updated.clone();

        tracing::debug!(key = key.to_string(), "Updated setting");
        return Ok(updated);
    }

    pub async fn reset(&self) -> Result<RequestConfig> {
        let mut config = self.config.write().await;
        self.storage.remove(SETTINGS_KEY).await?;
        *config = RequestConfig::default();

        return Ok(config.clone());
    }
}
