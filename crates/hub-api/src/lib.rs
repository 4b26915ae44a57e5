//! # hub-api
//!
//! GitHub REST API v3 client covering OAuth authorizations and repository
//! downloads. Method calls become signed HTTP requests; JSON responses come
//! back as typed resources. Each operation is a single stateless request -
//! no retries, no pagination.
//!
//! ```no_run
//! use hub_api::{Client, Credentials, RevokeAppAuthorization};
//!
//! # async fn run() -> hub_api::Result<()> {
//! let client = Client::new(Credentials::basic("client-id", "client-secret"))?;
//!
//! // Revoke a single token for the app.
//! client
//!     .oauth()
//!     .app()
//!     .revoke("client-id", Some("access-token"), RevokeAppAuthorization::default())
//!     .await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Security
//!
//! Tokens and client secrets are stored using `SecretString` which
//! automatically zeroizes memory when dropped, reducing credential exposure
//! in memory dumps.

mod auth;
mod client;
mod config;
mod downloads;
mod error;
mod oauth;
mod request;
mod transport;
mod types;

pub use auth::Credentials;
pub use client::Client;
pub use config::ClientConfig;
pub use downloads::{CreateDownload, Downloads, S3Uploader, Uploader, VALID_DOWNLOAD_PARAMS};
pub use error::{Error, Result};
pub use oauth::{
    AppAuthorizations, Authorizations, CreateAppAuthorization, CreateAuthorization,
    RevokeAppAuthorization, UpdateAuthorization, VALID_AUTH_PARAMS,
};
pub use request::{Params, RequestSpec};
// Re-export SecretString for constructing Credentials::Token directly
pub use secrecy::SecretString;
pub use transport::{HttpTransport, Response, Transport};
pub use types::{App, Authorization, Download, S3Grant};
