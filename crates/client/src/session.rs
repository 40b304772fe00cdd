/// Explicit per-session context: where the remote store lives and the
/// credential every request carries.
///
/// Constructed once at startup and passed by reference to the components
/// that need it; nothing in this crate reads ambient global state. Dropping
/// the session at logout tears the context down.
#[derive(Clone, Debug)]
pub struct Session {
    base_url: String,
    token: Option<String>,
}

impl Session {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: None,
        }
    }

    /// Attaches the bearer token obtained from the auth collaborator.
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        let token = token.into();
        self.token = (!token.is_empty()).then_some(token);
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }
}
