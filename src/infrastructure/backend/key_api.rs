#[cfg(test)]
#[path = "key_api_test.rs"]
mod tests;

use anyhow::bail;
use anyhow::Result;
use serde_derive::Deserialize;
use serde_derive::Serialize;

use super::gateway::error_message;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct SetKeyRequest {
    api_key: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct SetKeyResponse {
    token: Option<String>,
}

/// Unauthenticated endpoints used to obtain and check tokens.
pub struct KeyApi {
    url: String,
    client: reqwest::Client,
}

impl KeyApi {
    pub fn new(url: &str) -> KeyApi {
        return KeyApi {
            url: url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        };
    }

    /// Exchanges an API key for a backend issued token.
    pub async fn set_key(&self, api_key: &str) -> Result<String> {
        let api_key = api_key.trim();
        if api_key.is_empty() {
            bail!("API key cannot be empty");
        }

        let req = SetKeyRequest {
            api_key: api_key.to_string(),
        };
        let res = self
            .client
            .post(format!("{url}/api/set_key", url = self.url))
            .header("Accept", "application/json")
            .json(&req)
            .send()
            .await?;

        let status = res.status();
        let text = res.text().await?;
        if !status.is_success() {
            tracing::error!(status = status.as_u16(), "Key exchange failed");
            let msg = error_message(&text).unwrap_or_else(|| return "Failed to set key".to_string());
            bail!(msg);
        }

        let token_result: SetKeyResponse = serde_json::from_str(&text)?;
        return match token_result.token.filter(|e| return !e.is_empty()) {
            Some(token) => Ok(token),
            None => bail!("No token returned by server"),
        };
    }

    /// `Ok(false)` means the backend rejected the token. Transport errors are
    /// returned as errors.
    pub async fn check_key(&self, token: &str) -> Result<bool> {
        let res = self
            .client
            .get(format!("{url}/api/check_key", url = self.url))
            .query(&[("token", token)])
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "Token check rejected");
        }

        return Ok(status.is_success());
    }
}
