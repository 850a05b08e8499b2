#[cfg(test)]
#[path = "gateway_test.rs"]
mod tests;

use std::sync::Arc;

use serde_json::Map;
use serde_json::Value;
use tokio::sync::mpsc;

use crate::domain::models::Event;
use crate::domain::models::GatewayError;
use crate::domain::models::UnauthorizedReason;
use crate::domain::services::SessionStore;
use crate::domain::services::SettingsStore;

/// Pulls a human readable message out of an `{ "error": ... }` style body.
pub fn error_message(body: &str) -> Option<String> {
    let json: Value = serde_json::from_str(body).ok()?;
    return ["error", "message"].iter().find_map(|field| {
        return json
            .get(field)
            .and_then(|e| return e.as_str())
            .map(|e| return e.to_string());
    });
}

/// The single chokepoint for authenticated backend calls. Every call carries
/// the session token and the current `RequestConfig`.
pub struct AuthenticatedRequestGateway {
    url: String,
    client: reqwest::Client,
    session: Arc<SessionStore>,
    settings: Arc<SettingsStore>,
    events: Option<mpsc::UnboundedSender<Event>>,
}

impl AuthenticatedRequestGateway {
    pub fn new(
        url: &str,
        session: Arc<SessionStore>,
        settings: Arc<SettingsStore>,
    ) -> AuthenticatedRequestGateway {
        return AuthenticatedRequestGateway {
            url: url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
            session,
            settings,
            events: None,
        };
    }

    pub fn with_events(mut self, tx: mpsc::UnboundedSender<Event>) -> AuthenticatedRequestGateway {
        self.events = Some(tx);
        return self;
    }

    pub async fn call(
        &self,
        endpoint: &str,
        body: Map<String, Value>,
    ) -> Result<Value, GatewayError> {
        let token = match self.session.token().await {
            Some(token) => token,
            None => {
                return Err(self.invalidate(UnauthorizedReason::MissingToken).await);
            }
        };

        let mut payload = body;
        for (key, value) in self.settings.snapshot().await.to_map() {
            payload.insert(key, value);
        }

        let endpoint = endpoint.trim_start_matches('/');
        tracing::debug!(endpoint = endpoint, "Sending backend request");

        let res = self
            .client
            .post(format!("{url}/{endpoint}", url = self.url))
            .query(&[("token", token.as_str())])
            .header("Accept", "application/json")
            .json(&payload)
            .send()
            .await;

        let res = match res {
            Ok(res) => res,
            Err(err) => {
                tracing::error!(error = ?err, endpoint = endpoint, "Backend is not reachable");
                return Err(GatewayError::NetworkError(err.to_string()));
            }
        };

        let status = res.status();
        let text = match res.text().await {
            Ok(text) => text,
            Err(err) => {
                tracing::error!(error = ?err, endpoint = endpoint, "Failed to read backend response");
                return Err(GatewayError::NetworkError(err.to_string()));
            }
        };

        if status.is_success() {
            return serde_json::from_str::<Value>(&text).map_err(|err| {
                return GatewayError::MalformedResponse(err.to_string());
            });
        }

        if status == reqwest::StatusCode::UNAUTHORIZED {
            let detail = error_message(&text);
            return Err(self
                .invalidate(UnauthorizedReason::Rejected { detail })
                .await);
        }

        tracing::error!(
            status = status.as_u16(),
            endpoint = endpoint,
            "Backend request failed"
        );
        return Err(GatewayError::request_failed(
            status.as_u16(),
            error_message(&text),
        ));
    }

    /// Every unauthorized outcome clears the session and asks for a new key.
    async fn invalidate(&self, reason: UnauthorizedReason) -> GatewayError {
        tracing::warn!(reason = ?reason, "Session invalidated");

        if let Err(err) = self.session.logout().await {
            tracing::error!(error = ?err, "Failed to remove persisted token");
        }

        let err = GatewayError::Unauthorized(reason);
        if let Some(tx) = &self.events {
            if tx.send(Event::ReauthRequired(err.to_string())).is_err() {
                tracing::debug!("No listener for re-auth events");
            }
        }

        return err;
    }
}
