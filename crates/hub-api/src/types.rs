//! API resource types.

use serde::Deserialize;

use crate::error::{Error, Result};

/// An OAuth authorization.
#[derive(Debug, Clone, Deserialize)]
pub struct Authorization {
    /// Authorization id.
    pub id: u64,

    /// API URL of the authorization.
    pub url: Option<String>,

    /// The access token. Only returned on creation.
    pub token: Option<String>,

    /// Scopes this authorization is in.
    pub scopes: Option<Vec<String>>,

    /// A note to remind you what the token is for.
    pub note: Option<String>,

    /// A URL to remind you what the token is for.
    pub note_url: Option<String>,

    /// The application the authorization belongs to.
    pub app: Option<App>,
}

/// The OAuth application an authorization belongs to.
#[derive(Debug, Clone, Deserialize)]
pub struct App {
    /// Application name.
    pub name: Option<String>,

    /// Application URL.
    pub url: Option<String>,

    /// The application's client id.
    pub client_id: Option<String>,
}

/// A repository download resource.
///
/// The creation response carries the S3 grant fields the upload step needs;
/// resources fetched later may omit them.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Download {
    /// Download id.
    pub id: u64,

    /// API URL of the download.
    pub url: Option<String>,

    /// Browser URL of the download.
    pub html_url: Option<String>,

    /// File name.
    pub name: Option<String>,

    /// Description shown on the downloads page.
    pub description: Option<String>,

    /// File size in bytes.
    pub size: Option<u64>,

    /// MIME type of the file.
    pub mime_type: Option<String>,

    /// S3 object key prefix.
    pub path: Option<String>,

    /// S3 canned ACL.
    pub acl: Option<String>,

    /// AWS access key id for the signed upload.
    pub accesskeyid: Option<String>,

    /// Base64-encoded S3 upload policy.
    pub policy: Option<String>,

    /// Signature over the upload policy.
    pub signature: Option<String>,

    /// S3 bucket URL the file must be posted to.
    pub s3_url: Option<String>,
}

/// A validated view of the S3 grant carried by a [`Download`].
#[derive(Debug, Clone, Copy)]
pub struct S3Grant<'a> {
    /// S3 bucket URL.
    pub s3_url: &'a str,
    /// Object key prefix.
    pub path: &'a str,
    /// Canned ACL.
    pub acl: &'a str,
    /// File name.
    pub name: &'a str,
    /// AWS access key id.
    pub accesskeyid: &'a str,
    /// Upload policy.
    pub policy: &'a str,
    /// Policy signature.
    pub signature: &'a str,
    /// MIME type.
    pub mime_type: &'a str,
}

impl Download {
    /// View the S3 grant fields, checking that each one is present and
    /// non-empty.
    ///
    /// # Errors
    /// Returns [`Error::InvalidArgument`] naming the first missing field.
    pub fn s3_grant(&self) -> Result<S3Grant<'_>> {
        fn field<'a>(name: &'static str, value: &'a Option<String>) -> Result<&'a str> {
            match value.as_deref() {
                Some(v) if !v.trim().is_empty() => Ok(v),
                _ => Err(Error::InvalidArgument(format!(
                    "download resource is missing the `{name}` upload grant field"
                ))),
            }
        }

        Ok(S3Grant {
            s3_url: field("s3_url", &self.s3_url)?,
            path: field("path", &self.path)?,
            acl: field("acl", &self.acl)?,
            name: field("name", &self.name)?,
            accesskeyid: field("accesskeyid", &self.accesskeyid)?,
            policy: field("policy", &self.policy)?,
            signature: field("signature", &self.signature)?,
            mime_type: field("mime_type", &self.mime_type)?,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn grantable_download() -> Download {
        Download {
            id: 1,
            name: Some("archive.tar.gz".into()),
            size: Some(1024),
            mime_type: Some("application/x-gzip".into()),
            path: Some("downloads/peter/hub".into()),
            acl: Some("public-read".into()),
            accesskeyid: Some("AKIA123".into()),
            policy: Some("ewogICJl...".into()),
            signature: Some("sig==".into()),
            s3_url: Some("https://github.s3.amazonaws.com/".into()),
            ..Download::default()
        }
    }

    #[test]
    fn test_s3_grant_complete() {
        let download = grantable_download();
        let grant = download.s3_grant().unwrap();

        assert_eq!(grant.s3_url, "https://github.s3.amazonaws.com/");
        assert_eq!(grant.name, "archive.tar.gz");
    }

    #[test]
    fn test_s3_grant_missing_field() {
        let mut download = grantable_download();
        download.policy = None;

        let err = download.s3_grant().unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidArgument(ref message) if message.contains("policy")
        ));
    }

    #[test]
    fn test_s3_grant_blank_field() {
        let mut download = grantable_download();
        download.acl = Some("  ".into());

        assert!(download.s3_grant().is_err());
    }

    #[test]
    fn test_authorization_deserializes() {
        let auth: Authorization = serde_json::from_value(serde_json::json!({
            "id": 1,
            "url": "https://api.github.com/authorizations/1",
            "token": "abc123",
            "scopes": ["public_repo"],
            "note": "optional note",
            "note_url": null,
            "app": {
                "name": "my github app",
                "url": "http://my-github-app.com",
                "client_id": "abcde12345fghij67890"
            }
        }))
        .unwrap();

        assert_eq!(auth.id, 1);
        assert_eq!(auth.token.as_deref(), Some("abc123"));
        assert_eq!(
            auth.app.unwrap().client_id.as_deref(),
            Some("abcde12345fghij67890")
        );
    }

    #[test]
    fn test_download_deserializes_without_grant_fields() {
        let download: Download = serde_json::from_value(serde_json::json!({
            "id": 7,
            "name": "notes.txt",
            "size": 12
        }))
        .unwrap();

        assert_eq!(download.id, 7);
        assert!(download.s3_grant().is_err());
    }
}
