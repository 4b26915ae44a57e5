//! OAuth authorization façades.
//!
//! [`Authorizations`] covers the personal authorizations endpoints (basic
//! auth only); [`AppAuthorizations`] covers the per-application endpoints:
//! idempotent create-or-get and token revocation.

use reqwest::Method;
use serde::Serialize;

use crate::client::Client;
use crate::error::{Error, Result};
use crate::request::{Params, RequestSpec};
use crate::transport::{HttpTransport, Response, Transport};
use crate::types::Authorization;

/// Parameter names the authorizations endpoints recognize. Anything else
/// is sifted out before dispatch.
pub const VALID_AUTH_PARAMS: &[&str] = &[
    "scopes",
    "add_scopes",
    "remove_scopes",
    "note",
    "note_url",
    "client_id",
    "client_secret",
];

/// Options for creating a personal authorization.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CreateAuthorization {
    /// Scopes the new authorization is in.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scopes: Option<Vec<String>>,

    /// A note to remind you what the token is for.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,

    /// A URL to remind you what the token is for.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note_url: Option<String>,

    /// Client id of an app the authorization is tied to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,

    /// Client secret matching `client_id`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_secret: Option<String>,
}

/// Options for updating a personal authorization.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateAuthorization {
    /// Replace the scope list.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scopes: Option<Vec<String>>,

    /// Scopes to add to the existing list.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub add_scopes: Option<Vec<String>>,

    /// Scopes to remove from the existing list.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remove_scopes: Option<Vec<String>>,

    /// New note.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,

    /// New note URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note_url: Option<String>,
}

/// Options for the app create-or-get operation.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CreateAppAuthorization {
    /// The 40 character OAuth app client secret associated with the client
    /// id in the path.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_secret: Option<String>,

    /// Scopes the authorization is in.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scopes: Option<Vec<String>>,

    /// A note to remind you what the token is for.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,

    /// A URL to remind you what the token is for.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note_url: Option<String>,
}

/// Options for the app revoke operation.
///
/// A token set here takes precedence over the positional `access_token`
/// argument of [`AppAuthorizations::revoke`].
#[derive(Debug, Clone, Default, Serialize)]
pub struct RevokeAppAuthorization {
    /// The access token to revoke.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
}

/// Façade over the personal authorizations endpoints.
///
/// These endpoints only accept basic authentication with the account's
/// credentials; every operation checks that before building a request.
#[derive(Debug, Clone, Copy)]
pub struct Authorizations<'a, T = HttpTransport> {
    client: &'a Client<T>,
}

impl<'a, T: Transport> Authorizations<'a, T> {
    pub(crate) const fn new(client: &'a Client<T>) -> Self {
        Self { client }
    }

    /// The per-application authorizations façade.
    #[must_use]
    pub const fn app(&self) -> AppAuthorizations<'a, T> {
        AppAuthorizations {
            client: self.client,
        }
    }

    /// List your authorizations.
    ///
    /// # Errors
    /// Fails with [`Error::AuthenticationRequired`] unless basic auth is set.
    pub async fn list(&self) -> Result<Vec<Authorization>> {
        self.ensure_basic_auth()?;
        let spec =
            RequestSpec::build(Method::GET, "/authorizations", &[], &[], &[], Params::new())?;
        self.client.execute(&spec).await?.json()
    }

    /// Get a single authorization.
    ///
    /// # Errors
    /// Fails with [`Error::AuthenticationRequired`] unless basic auth is set.
    pub async fn get(&self, id: u64) -> Result<Authorization> {
        self.ensure_basic_auth()?;
        let spec = RequestSpec::build(
            Method::GET,
            "/authorizations/{id}",
            &[("id", &id.to_string())],
            &[],
            &[],
            Params::new(),
        )?;
        self.client.execute(&spec).await?.json()
    }

    /// Create a new authorization.
    ///
    /// # Errors
    /// Fails with [`Error::AuthenticationRequired`] unless basic auth is set.
    pub async fn create(&self, options: CreateAuthorization) -> Result<Authorization> {
        self.ensure_basic_auth()?;
        let params = Params::from_options(&options)?;
        let spec = RequestSpec::build(
            Method::POST,
            "/authorizations",
            &[],
            &[],
            VALID_AUTH_PARAMS,
            params,
        )?;
        self.client.execute(&spec).await?.json()
    }

    /// Update an existing authorization.
    ///
    /// # Errors
    /// Fails with [`Error::AuthenticationRequired`] unless basic auth is set.
    pub async fn update(&self, id: u64, options: UpdateAuthorization) -> Result<Authorization> {
        self.ensure_basic_auth()?;
        let params = Params::from_options(&options)?;
        let spec = RequestSpec::build(
            Method::PATCH,
            "/authorizations/{id}",
            &[("id", &id.to_string())],
            &[],
            VALID_AUTH_PARAMS,
            params,
        )?;
        self.client.execute(&spec).await?.json()
    }

    /// Delete an authorization.
    ///
    /// # Errors
    /// Fails with [`Error::AuthenticationRequired`] unless basic auth is set.
    pub async fn delete(&self, id: u64) -> Result<Response> {
        self.ensure_basic_auth()?;
        let spec = RequestSpec::build(
            Method::DELETE,
            "/authorizations/{id}",
            &[("id", &id.to_string())],
            &[],
            &[],
            Params::new(),
        )?;
        self.client.execute(&spec).await
    }

    fn ensure_basic_auth(&self) -> Result<()> {
        if self.client.credentials().is_basic_authenticated() {
            Ok(())
        } else {
            Err(Error::AuthenticationRequired)
        }
    }
}

/// Façade over the per-application authorization endpoints.
#[derive(Debug, Clone, Copy)]
pub struct AppAuthorizations<'a, T = HttpTransport> {
    client: &'a Client<T>,
}

impl<T: Transport> AppAuthorizations<'_, T> {
    /// Get-or-create an authorization for a specific app.
    ///
    /// Issues an idempotent `PUT /authorizations/clients/{client_id}`:
    /// creating the authorization on first call and returning the existing
    /// one afterwards.
    ///
    /// # Errors
    /// Fails with [`Error::AuthenticationRequired`] before any network call
    /// when the session is unauthenticated, and with [`Error::Configuration`]
    /// when `client_id` is blank.
    pub async fn create(
        &self,
        client_id: &str,
        options: CreateAppAuthorization,
    ) -> Result<Authorization> {
        self.ensure_authenticated()?;
        Self::ensure_client_id(client_id)?;

        let params = Params::from_options(&options)?;
        let spec = RequestSpec::build(
            Method::PUT,
            "/authorizations/clients/{client_id}",
            &[("client_id", client_id)],
            &[],
            VALID_AUTH_PARAMS,
            params,
        )?;
        self.client.execute(&spec).await?.json()
    }

    /// Revoke one authorization for an application, or all of them.
    ///
    /// When an access token is supplied - either positionally or through
    /// `options`, with the named option taking precedence - a scoped
    /// `DELETE /applications/{client_id}/tokens/{access_token}` revokes just
    /// that authorization. Without a token, every token of the application
    /// is revoked.
    ///
    /// # Errors
    /// Fails with [`Error::AuthenticationRequired`] before any network call
    /// when the session is unauthenticated, and with [`Error::Configuration`]
    /// when `client_id` is blank.
    pub async fn revoke(
        &self,
        client_id: &str,
        access_token: Option<&str>,
        options: RevokeAppAuthorization,
    ) -> Result<Response> {
        self.ensure_authenticated()?;
        Self::ensure_client_id(client_id)?;

        let mut params = Params::from_options(&options)?;
        let spec = match params.take_or("access_token", access_token) {
            Some(token) => RequestSpec::build(
                Method::DELETE,
                "/applications/{client_id}/tokens/{access_token}",
                &[("client_id", client_id), ("access_token", &token)],
                &[],
                &[],
                params,
            )?,
            None => RequestSpec::build(
                Method::DELETE,
                "/applications/{client_id}/tokens",
                &[("client_id", client_id)],
                &[],
                &[],
                params,
            )?,
        };
        self.client.execute(&spec).await
    }

    /// Alias for [`revoke`](Self::revoke).
    ///
    /// # Errors
    /// Same as [`revoke`](Self::revoke).
    pub async fn remove(
        &self,
        client_id: &str,
        access_token: Option<&str>,
        options: RevokeAppAuthorization,
    ) -> Result<Response> {
        self.revoke(client_id, access_token, options).await
    }

    fn ensure_authenticated(&self) -> Result<()> {
        if self.client.is_authenticated() {
            Ok(())
        } else {
            Err(Error::AuthenticationRequired)
        }
    }

    fn ensure_client_id(client_id: &str) -> Result<()> {
        if client_id.trim().is_empty() {
            return Err(Error::Configuration(
                "to authorize an application, provide the client_id argument \
                 together with the client_secret parameter"
                    .to_string(),
            ));
        }
        Ok(())
    }
}
