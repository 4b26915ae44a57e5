//! Credential handling for the API session.

use secrecy::SecretString;

/// Credentials held by a client session.
///
/// Immutable once constructed; the session owns them for its lifetime.
/// Secrets are stored as [`SecretString`] which zeroizes memory on drop
/// and redacts itself from `Debug` output.
#[derive(Debug, Clone)]
pub enum Credentials {
    /// No credentials; only unauthenticated endpoints are reachable.
    Anonymous,

    /// OAuth application identity (client id + secret), sent as HTTP basic auth.
    Basic {
        /// The 20 character OAuth application client id.
        client_id: String,
        /// The 40 character OAuth application client secret.
        client_secret: SecretString,
    },

    /// A personal or OAuth access token, sent as a bearer header.
    Token(SecretString),
}

impl Credentials {
    /// Create token credentials.
    #[must_use]
    pub fn token(token: impl Into<String>) -> Self {
        Self::Token(SecretString::from(token.into()))
    }

    /// Create basic-auth credentials from a client id/secret pair.
    #[must_use]
    pub fn basic(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self::Basic {
            client_id: client_id.into(),
            client_secret: SecretString::from(client_secret.into()),
        }
    }

    /// Resolve credentials from the environment.
    ///
    /// Tries in order: `HUB_API_TOKEN`, then the
    /// `HUB_API_CLIENT_ID`/`HUB_API_CLIENT_SECRET` pair, else anonymous.
    #[must_use]
    pub fn from_env() -> Self {
        if let Ok(token) = std::env::var("HUB_API_TOKEN") {
            return Self::Token(SecretString::from(token));
        }

        match (
            std::env::var("HUB_API_CLIENT_ID"),
            std::env::var("HUB_API_CLIENT_SECRET"),
        ) {
            (Ok(client_id), Ok(client_secret)) => Self::Basic {
                client_id,
                client_secret: SecretString::from(client_secret),
            },
            _ => Self::Anonymous,
        }
    }

    /// Whether a token or a basic-auth pair is set. No side effects.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        !matches!(self, Self::Anonymous)
    }

    /// Whether a basic-auth pair is set.
    ///
    /// The personal authorizations endpoints only accept basic auth.
    #[must_use]
    pub const fn is_basic_authenticated(&self) -> bool {
        matches!(self, Self::Basic { .. })
    }
}

impl Default for Credentials {
    fn default() -> Self {
        Self::from_env()
    }
}
