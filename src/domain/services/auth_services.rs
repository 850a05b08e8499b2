#[cfg(test)]
#[path = "auth_services_test.rs"]
mod tests;

use std::sync::Arc;

use anyhow::Result;
use tokio::sync::mpsc;

use super::SessionStore;
use crate::domain::models::AuthState;
use crate::domain::models::Event;
use crate::domain::models::NOT_LOGGED_IN_MESSAGE;
use crate::domain::models::REAUTH_MESSAGE;
use crate::infrastructure::backend::KeyApi;

/// Decides once per run whether the stored token is still good, and handles
/// the key submissions that follow.
pub struct StartupValidation {
    state: AuthState,
    session: Arc<SessionStore>,
    key_api: KeyApi,
    events: Option<mpsc::UnboundedSender<Event>>,
}

impl StartupValidation {
    pub fn new(session: Arc<SessionStore>, key_api: KeyApi) -> StartupValidation {
        return StartupValidation {
            state: AuthState::Unknown,
            session,
            key_api,
            events: None,
        };
    }

    pub fn with_events(mut self, tx: mpsc::UnboundedSender<Event>) -> StartupValidation {
        self.events = Some(tx);
        return self;
    }

    pub fn state(&self) -> AuthState {
        return self.state;
    }

    /// Checks the stored token against the backend. Only the first call does
    /// any work, later calls report the state already reached.
    pub async fn run(&mut self) -> Result<AuthState> {
        if self.state != AuthState::Unknown {
            return Ok(self.state);
        }
        self.state = AuthState::Validating;

        let token = match self.session.token().await {
            Some(token) => token,
            None => {
                tracing::debug!("No stored token");
                self.unauthenticate(NOT_LOGGED_IN_MESSAGE).await?;
                return Ok(self.state);
            }
        };

        let valid = match self.key_api.check_key(&token).await {
            Ok(valid) => valid,
            Err(err) => {
                tracing::error!(error = ?err, "Error during token validity check");
                false
            }
        };

        if valid {
            self.authenticate();
        } else {
            self.unauthenticate(REAUTH_MESSAGE).await?;
        }

        return Ok(self.state);
    }

    /// Exchanges a freshly entered API key for a token and logs in with it.
    pub async fn submit_key(&mut self, api_key: &str) -> Result<AuthState> {
        let token = match self.key_api.set_key(api_key).await {
            Ok(token) => token,
            Err(err) => {
                self.state = AuthState::Unauthenticated;
                return Err(err);
            }
        };

        self.session.login(&token).await?;
        self.authenticate();

        return Ok(self.state);
    }

    /// Used when a later call came back unauthorized. The gateway has already
    /// cleared the session and signalled, so only the state moves.
    pub fn force_unauthenticated(&mut self) {
        self.state = AuthState::Unauthenticated;
    }

    fn authenticate(&mut self) {
        self.state = AuthState::Authenticated;
        tracing::info!("Token valid");
        self.send(Event::Authenticated);
    }

    async fn unauthenticate(&mut self, message: &str) -> Result<()> {
        self.state = AuthState::Unauthenticated;
        self.session.logout().await?;
        self.send(Event::ReauthRequired(message.to_string()));

        return Ok(());
    }

    fn send(&self, event: Event) {
        if let Some(tx) = &self.events {
            if tx.send(event).is_err() {
                tracing::debug!("No listener for auth events");
            }
        }
    }
}
