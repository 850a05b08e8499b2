/// Progress of the token check performed when the app starts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum AuthState {
    #[default]
    Unknown,
    Validating,
    Authenticated,
    Unauthenticated,
}

