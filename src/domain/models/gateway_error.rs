#[cfg(test)]
#[path = "gateway_error_test.rs"]
mod tests;

use std::fmt;

use thiserror::Error;

pub const REAUTH_MESSAGE: &str = "API key is invalid or has expired, please enter it again.";
pub const NOT_LOGGED_IN_MESSAGE: &str = "You are not logged in, please enter your API key.";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UnauthorizedReason {
    /// No token was held, the request never left the client.
    MissingToken,
    /// The backend answered 401. `detail` is the server supplied error, if any.
    Rejected { detail: Option<String> },
}

impl fmt::Display for UnauthorizedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnauthorizedReason::MissingToken => return write!(f, "{NOT_LOGGED_IN_MESSAGE}"),
            UnauthorizedReason::Rejected { .. } => return write!(f, "{REAUTH_MESSAGE}"),
        }
    }
}

#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum GatewayError {
    #[error("{0}")]
    Unauthorized(UnauthorizedReason),

    #[error("{message}")]
    RequestFailed { status: u16, message: String },

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

impl GatewayError {
    pub fn request_failed(status: u16, message: Option<String>) -> GatewayError {
        let message = message
            .filter(|e| return !e.is_empty())
            .unwrap_or_else(|| return format!("request failed: {status}"));

        return GatewayError::RequestFailed { status, message };
    }

    pub fn is_unauthorized(&self) -> bool {
        return matches!(self, GatewayError::Unauthorized(_));
    }

    /// Text shown in a tool's error field. Session errors are shown as is so
    /// they read differently from a failed generation.
    pub fn user_message(&self) -> String {
        if self.is_unauthorized() {
            return self.to_string();
        }

        return format!("Generation failed: {self}");
    }
}
