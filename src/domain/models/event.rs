/// Signals sent from the session layer to whatever is presenting it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// A valid token is held and the main content can be shown.
    Authenticated,
    /// The session was cleared, a new API key has to be entered.
    ReauthRequired(String),
}
