//! HTTP dispatch: the transport contract and its reqwest implementation.

use std::future::Future;

use reqwest::Method;
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::auth::Credentials;
use crate::error::{Error, Result};
use crate::request::RequestSpec;

/// A structured response: status, parsed JSON body, and headers.
///
/// Created by the transport; read-only to callers.
#[derive(Debug, Clone)]
pub struct Response {
    status: u16,
    body: Value,
    headers: HeaderMap,
}

impl Response {
    /// Assemble a response. Intended for transports and test doubles.
    #[must_use]
    pub const fn new(status: u16, body: Value, headers: HeaderMap) -> Self {
        Self {
            status,
            body,
            headers,
        }
    }

    /// HTTP status code.
    #[must_use]
    pub const fn status(&self) -> u16 {
        self.status
    }

    /// Parsed JSON body (`null` for empty bodies such as 204 responses).
    #[must_use]
    pub const fn body(&self) -> &Value {
        &self.body
    }

    /// Response headers.
    #[must_use]
    pub const fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Deserialize the body into a typed resource.
    ///
    /// # Errors
    /// Returns error if the body does not match `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_value(self.body.clone()).map_err(Error::from)
    }
}

/// Collaborator performing the actual network I/O.
///
/// Abstracting dispatch behind a trait allows mock transports in tests and
/// alternative implementations (e.g., a recording or caching transport).
pub trait Transport: Send + Sync {
    /// Execute a request and return the structured response.
    ///
    /// Transport-level failures surface unchanged as [`Error::Transport`].
    fn send(&self, spec: &RequestSpec) -> impl Future<Output = Result<Response>> + Send;
}

/// Transport backed by a reqwest client.
pub struct HttpTransport {
    http: reqwest::Client,
    base_url: String,
    credentials: Credentials,
}

impl HttpTransport {
    /// Media type accepted from the service.
    const MEDIA_TYPE: &'static str = "application/vnd.github.v3+json";

    /// Create a transport against `base_url`, authenticating each request
    /// with `credentials`.
    ///
    /// # Errors
    /// Returns error if the underlying HTTP client cannot be built.
    pub fn new(
        credentials: Credentials,
        base_url: impl Into<String>,
        user_agent: &str,
    ) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(Self::MEDIA_TYPE));

        let http = reqwest::Client::builder()
            .user_agent(user_agent)
            .default_headers(headers)
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.into(),
            credentials,
        })
    }

    /// Credentials this transport signs requests with.
    #[must_use]
    pub const fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Base URL requests are issued against.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn apply_credentials(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.credentials {
            Credentials::Anonymous => request,
            Credentials::Basic {
                client_id,
                client_secret,
            } => request.basic_auth(client_id, Some(client_secret.expose_secret())),
            Credentials::Token(token) => request.header(
                AUTHORIZATION,
                format!("Bearer {}", token.expose_secret()),
            ),
        }
    }
}

impl Transport for HttpTransport {
    async fn send(&self, spec: &RequestSpec) -> Result<Response> {
        let url = format!("{}{}", self.base_url, spec.path);
        debug!(method = %spec.method, url = %url, "dispatching request");

        let mut request = self.apply_credentials(self.http.request(spec.method.clone(), &url));
        if !spec.params.is_empty() {
            request = if spec.method == Method::GET {
                request.query(&spec.params)
            } else {
                request.json(&spec.params)
            };
        }

        let response = request.send().await?;
        let status = response.status();
        let headers = response.headers().clone();
        let text = response.text().await?;

        if status.as_u16() == 401 {
            return Err(Error::AuthenticationFailed);
        }
        if !status.is_success() {
            return Err(Error::Api {
                status: status.as_u16(),
                message: text,
            });
        }

        let body = if text.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text)?
        };

        Ok(Response::new(status.as_u16(), body, headers))
    }
}

impl std::fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTransport")
            .field("base_url", &self.base_url)
            .field("credentials", &self.credentials)
            .finish_non_exhaustive()
    }
}
