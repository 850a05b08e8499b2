#[cfg(test)]
#[path = "pending_call_test.rs"]
mod tests;

use serde_json::Value;

use super::GatewayError;

/// Per invocation progress of a single tool call.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PendingCall {
    is_loading: bool,
    error: Option<String>,
    result: Option<Value>,
}

impl PendingCall {
    pub fn start(&mut self) {
        self.is_loading = true;
        self.error = None;
        self.result = None;
    }

    pub fn succeed(&mut self, value: Value) {
        self.is_loading = false;
        self.result = Some(value);
    }

    pub fn fail(&mut self, err: &GatewayError) {
        self.is_loading = false;
        self.error = Some(err.user_message());
        self.result = None;
    }

    pub fn is_loading(&self) -> bool {
        return self.is_loading;
    }

    pub fn error(&self) -> Option<&str> {
        return self.error.as_deref();
    }

    pub fn result(&self) -> Option<&Value> {
        return self.result.as_ref();
    }
}
