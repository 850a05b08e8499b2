#[cfg(test)]
#[path = "session_test.rs"]
mod tests;

/// Client side record of whether a backend token is currently held.
///
/// `is_authenticated` is only ever true while a non-empty token is present.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Session {
    token: String,
    is_authenticated: bool,
}

impl Session {
    /// Returns an authenticated session for a token that was just issued or
    /// read back from storage. An empty token produces a cleared session.
    pub fn new(token: &str) -> Session {
        if token.is_empty() {
            return Session::default();
        }

        return Session {
            token: token.to_string(),
            is_authenticated: true,
        };
    }

    pub fn token(&self) -> Option<&str> {
        if self.token.is_empty() {
            return None;
        }

        return Some(&self.token);
    }

    pub fn is_authenticated(&self) -> bool {
        return self.is_authenticated;
    }

    pub fn clear(&mut self) {
        self.token = "".to_string();
        self.is_authenticated = false;
    }
}
