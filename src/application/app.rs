#[cfg(test)]
#[path = "app_test.rs"]
mod tests;

use std::sync::Arc;

use anyhow::Result;
use tokio::sync::mpsc;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::Event;
use crate::domain::models::StorageBox;
use crate::domain::services::SessionStore;
use crate::domain::services::SettingsStore;
use crate::domain::services::StartupValidation;
use crate::domain::services::Tools;
use crate::infrastructure::backend::AuthenticatedRequestGateway;
use crate::infrastructure::backend::KeyApi;
use crate::infrastructure::storage::file::FileStorage;

/// Everything one run of the app shares: a single session, the settings and
/// the gateway built on top of them.
pub struct AppContext {
    pub session: Arc<SessionStore>,
    pub settings: Arc<SettingsStore>,
    pub validation: StartupValidation,
    pub tools: Tools,
    events: mpsc::UnboundedReceiver<Event>,
}

impl AppContext {
    pub async fn open() -> Result<AppContext> {
        let storage: StorageBox = Arc::new(FileStorage::default());
        return AppContext::open_with(&Config::get(ConfigKey::BackendURL), storage).await;
    }

    pub async fn open_with(url: &str, storage: StorageBox) -> Result<AppContext> {
        let (tx, rx) = mpsc::unbounded_channel::<Event>();

        let session = Arc::new(SessionStore::hydrate(storage.clone()).await?);
        let settings = Arc::new(SettingsStore::hydrate(storage).await?);
        let gateway = AuthenticatedRequestGateway::new(url, session.clone(), settings.clone())
            .with_events(tx.clone());
        let validation = StartupValidation::new(session.clone(), KeyApi::new(url)).with_events(tx);

        return Ok(AppContext {
            session,
            settings,
            validation,
            tools: Tools::new(Arc::new(gateway)),
            events: rx,
        });
    }

    /// Returns the signals emitted since the last drain.
    pub fn drain_events(&mut self) -> Vec<Event> {
        let mut events = vec![];
        while let Ok(event) = self.events.try_recv() {
            events.push(event);
        }

        return events;
    }
}
