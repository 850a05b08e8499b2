#[cfg(test)]
#[path = "session_store_test.rs"]
mod tests;

use anyhow::bail;
use anyhow::Result;
use tokio::sync::RwLock;

use crate::domain::models::Session;
use crate::domain::models::StorageBox;

pub const AUTH_TOKEN_KEY: &str = "art_spark_auth_token";

/// Holds the one session of a running app and mirrors every change to storage.
pub struct SessionStore {
    storage: StorageBox,
    session: RwLock<Session>,
}

impl SessionStore {
    pub fn new(storage: StorageBox) -> SessionStore {
        return SessionStore {
            storage,
            session: RwLock::new(Session::default()),
        };
    }

    /// Restores a persisted token. It counts as authenticated until a startup
    /// validation says otherwise. A token that cannot be read is removed and the session starts empty.
    pub async fn hydrate(storage: StorageBox) -> Result<SessionStore> {
        let token = match storage.get(AUTH_TOKEN_KEY).await {
            Ok(token) => token.unwrap_or_default(),
            Err(err) => {
                tracing::warn!(error = ?err, "Stored token is unreadable, discarding it");
                storage.remove(AUTH_TOKEN_KEY).await?;
                "".to_string()
            }
        };
        let token = token.trim();
        tracing::debug!(has_token = !token.is_empty(), "Hydrated session");

        return Ok(SessionStore {
            session: RwLock::new(Session::new(token)),
            storage,
        });
    }

    pub async fn login(&self, token: &str) -> Result<()> {
        let token = token.trim();
        if token.is_empty() {
            bail!("Cannot log in with an empty token");
        }

        let mut session = self.session.write().await;
        self.storage.set(AUTH_TOKEN_KEY, token).await?;
        *session = Session::new(token);

        tracing::info!("Logged in");
        return Ok(());
    }

    /// Clears the session under the write lock so readers never see a half
    /// cleared state. The in-memory session is cleared even if storage fails.
    pub async fn logout(&self) -> Result<()> {
        let mut session = self.session.write().await;
        session.clear();
        self.storage.remove(AUTH_TOKEN_KEY).await?;

        tracing::info!("Logged out");
        return Ok(());
    }

    pub async fn snapshot(&self) -> Session {
        return self.session.read().await.clone();
    }

    pub async fn token(&self) -> Option<String> {
        return self
            .session
            .read()
            .await
            .token()
            .map(|token| return token.to_string());
    }

    pub async fn is_authenticated(&self) -> bool {
        return self.session.read().await.is_authenticated();
    }
}
