//! The client session: resolved credentials plus a transport.

use crate::auth::Credentials;
use crate::config::ClientConfig;
use crate::downloads::Downloads;
use crate::error::Result;
use crate::oauth::Authorizations;
use crate::request::RequestSpec;
use crate::transport::{HttpTransport, Response, Transport};

/// An API client session.
///
/// Holds the resolved [`Credentials`] for its lifetime and dispatches every
/// façade operation through its transport. Generic over [`Transport`] so
/// tests can substitute a mock; defaults to the reqwest-backed
/// [`HttpTransport`].
pub struct Client<T = HttpTransport> {
    credentials: Credentials,
    transport: T,
}

impl Client<HttpTransport> {
    /// Default API URL.
    pub const DEFAULT_API_URL: &'static str = "https://api.github.com";

    /// User agent sent with every request.
    pub const DEFAULT_USER_AGENT: &'static str =
        concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

    /// Create a client against the default API URL.
    ///
    /// # Errors
    /// Returns error if the transport cannot be built.
    pub fn new(credentials: Credentials) -> Result<Self> {
        Self::with_base_url(credentials, Self::DEFAULT_API_URL)
    }

    /// Create a client against a custom API URL (e.g., an enterprise host).
    ///
    /// # Errors
    /// Returns error if the transport cannot be built.
    pub fn with_base_url(credentials: Credentials, base_url: impl Into<String>) -> Result<Self> {
        let transport =
            HttpTransport::new(credentials.clone(), base_url, Self::DEFAULT_USER_AGENT)?;
        Ok(Self {
            credentials,
            transport,
        })
    }

    /// Create a client from a loaded [`ClientConfig`], falling back to
    /// defaults for unset fields.
    ///
    /// # Errors
    /// Returns error if the transport cannot be built.
    pub fn from_config(credentials: Credentials, config: &ClientConfig) -> Result<Self> {
        let base_url = config
            .api_url
            .clone()
            .unwrap_or_else(|| Self::DEFAULT_API_URL.to_string());
        let user_agent = config
            .user_agent
            .as_deref()
            .unwrap_or(Self::DEFAULT_USER_AGENT);

        let transport = HttpTransport::new(credentials.clone(), base_url, user_agent)?;
        Ok(Self {
            credentials,
            transport,
        })
    }

    /// Base URL requests are issued against.
    #[must_use]
    pub fn base_url(&self) -> &str {
        self.transport.base_url()
    }
}

impl<T: Transport> Client<T> {
    /// Create a client over a caller-supplied transport.
    pub const fn with_transport(credentials: Credentials, transport: T) -> Self {
        Self {
            credentials,
            transport,
        }
    }

    /// Credentials held by this session.
    #[must_use]
    pub const fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// The transport this session dispatches through.
    #[must_use]
    pub const fn transport(&self) -> &T {
        &self.transport
    }

    /// Whether the session holds credentials.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.credentials.is_authenticated()
    }

    /// The authorizations façade.
    #[must_use]
    pub const fn oauth(&self) -> Authorizations<'_, T> {
        Authorizations::new(self)
    }

    /// The downloads façade for a repository.
    #[must_use]
    pub fn downloads(&self, owner: impl Into<String>, repo: impl Into<String>) -> Downloads<'_, T> {
        Downloads::new(self, owner.into(), repo.into())
    }

    /// Dispatch a built request through the transport.
    pub(crate) async fn execute(&self, spec: &RequestSpec) -> Result<Response> {
        self.transport.send(spec).await
    }
}

impl<T> std::fmt::Debug for Client<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("credentials", &self.credentials)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_with_base_url() {
        let client =
            Client::with_base_url(Credentials::token("t"), "https://hub.example.com").unwrap();
        assert_eq!(client.base_url(), "https://hub.example.com");
        assert!(client.is_authenticated());
    }

    #[test]
    fn test_from_config_defaults() {
        let client = Client::from_config(Credentials::Anonymous, &ClientConfig::default()).unwrap();
        assert_eq!(client.base_url(), Client::DEFAULT_API_URL);
        assert!(!client.is_authenticated());
    }

    #[test]
    fn test_from_config_overrides() {
        let config = ClientConfig {
            api_url: Some("https://hub.internal/api/v3".into()),
            user_agent: Some("internal-tools".into()),
        };

        let client = Client::from_config(Credentials::token("t"), &config).unwrap();
        assert_eq!(client.base_url(), "https://hub.internal/api/v3");
    }

    #[test]
    fn test_debug_redacts_credentials() {
        let client = Client::new(Credentials::token("super-secret")).unwrap();
        assert!(!format!("{client:?}").contains("super-secret"));
    }
}
