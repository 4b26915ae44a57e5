//! Repository downloads and the S3 upload delegation.
//!
//! Creating a download returns an S3 grant; the actual file is then posted
//! to S3 through an [`Uploader`] delegate. Both halves validate their input
//! before any network traffic.

use std::future::Future;
use std::path::Path;

use reqwest::Method;
use reqwest::multipart::{Form, Part};
use serde::Serialize;
use tracing::debug;

use crate::client::Client;
use crate::error::{Error, Result};
use crate::request::{Params, RequestSpec};
use crate::transport::{HttpTransport, Response, Transport};
use crate::types::Download;

/// Parameter names the downloads endpoints recognize.
pub const VALID_DOWNLOAD_PARAMS: &[&str] = &["name", "size", "description", "content_type"];

const REQUIRED_DOWNLOAD_PARAMS: &[&str] = &["name", "size"];

/// Options for registering a new download.
#[derive(Debug, Clone, Serialize)]
pub struct CreateDownload {
    /// File name shown on the downloads page.
    pub name: String,

    /// File size in bytes.
    pub size: u64,

    /// Description shown on the downloads page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// MIME type of the file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
}

impl CreateDownload {
    /// Options for a file of the given name and size.
    #[must_use]
    pub const fn new(name: String, size: u64) -> Self {
        Self {
            name,
            size,
            description: None,
            content_type: None,
        }
    }
}

/// Delegate performing the actual S3 upload.
///
/// Returns the raw response body on success; the façade hands it back to
/// the caller unchanged.
pub trait Uploader: Send + Sync {
    /// Post the file at `filename` to the S3 grant carried by `download`.
    fn send(
        &self,
        download: &Download,
        filename: &Path,
    ) -> impl Future<Output = Result<String>> + Send;
}

/// Default [`Uploader`]: a multipart POST against the grant's S3 bucket URL.
#[derive(Debug, Default)]
pub struct S3Uploader {
    http: reqwest::Client,
}

impl S3Uploader {
    /// Create an uploader with its own HTTP client.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Uploader for S3Uploader {
    async fn send(&self, download: &Download, filename: &Path) -> Result<String> {
        let grant = download.s3_grant()?;
        let bytes = tokio::fs::read(filename).await?;
        debug!(s3_url = grant.s3_url, name = grant.name, "uploading to S3");

        // S3 requires the file part last.
        let form = Form::new()
            .text("key", grant.path.to_string())
            .text("acl", grant.acl.to_string())
            .text("success_action_status", "201")
            .text("Filename", grant.name.to_string())
            .text("AWSAccessKeyId", grant.accesskeyid.to_string())
            .text("Policy", grant.policy.to_string())
            .text("Signature", grant.signature.to_string())
            .text("Content-Type", grant.mime_type.to_string())
            .part("file", Part::bytes(bytes).file_name(grant.name.to_string()));

        let response = self.http.post(grant.s3_url).multipart(form).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if status.is_success() {
            Ok(body)
        } else {
            Err(Error::Api {
                status: status.as_u16(),
                message: body,
            })
        }
    }
}

/// Façade over a repository's downloads endpoints.
#[derive(Debug, Clone)]
pub struct Downloads<'a, T = HttpTransport> {
    client: &'a Client<T>,
    owner: String,
    repo: String,
}

impl<'a, T: Transport> Downloads<'a, T> {
    pub(crate) const fn new(client: &'a Client<T>, owner: String, repo: String) -> Self {
        Self {
            client,
            owner,
            repo,
        }
    }

    /// List downloads for the repository.
    ///
    /// # Errors
    /// Returns error if the request fails.
    pub async fn list(&self) -> Result<Vec<Download>> {
        let spec = self.build(Method::GET, "/repos/{owner}/{repo}/downloads", &[], Params::new())?;
        self.client.execute(&spec).await?.json()
    }

    /// Get a single download.
    ///
    /// # Errors
    /// Returns error if the request fails.
    pub async fn get(&self, id: u64) -> Result<Download> {
        let id = id.to_string();
        let spec = self.build(
            Method::GET,
            "/repos/{owner}/{repo}/downloads/{id}",
            &[("id", &id)],
            Params::new(),
        )?;
        self.client.execute(&spec).await?.json()
    }

    /// Register a new download, returning the resource with its S3 grant.
    ///
    /// # Errors
    /// Fails with [`Error::Validation`] if `name` or `size` is missing from
    /// the serialized options; otherwise returns error if the request fails.
    pub async fn create(&self, options: CreateDownload) -> Result<Download> {
        let params = Params::from_options(&options)?;
        let spec = RequestSpec::build(
            Method::POST,
            "/repos/{owner}/{repo}/downloads",
            &[("owner", &self.owner), ("repo", &self.repo)],
            REQUIRED_DOWNLOAD_PARAMS,
            VALID_DOWNLOAD_PARAMS,
            params,
        )?;
        self.client.execute(&spec).await?.json()
    }

    /// Delete a download.
    ///
    /// # Errors
    /// Returns error if the request fails.
    pub async fn delete(&self, id: u64) -> Result<Response> {
        let id = id.to_string();
        let spec = self.build(
            Method::DELETE,
            "/repos/{owner}/{repo}/downloads/{id}",
            &[("id", &id)],
            Params::new(),
        )?;
        self.client.execute(&spec).await
    }

    /// Upload the file at `filename` against the S3 grant in `download`,
    /// using the default [`S3Uploader`].
    ///
    /// Returns the delegate's response body unchanged.
    ///
    /// # Errors
    /// Fails with [`Error::InvalidArgument`] - without invoking the
    /// delegate - when the grant is incomplete or `filename` is not a
    /// readable regular file.
    pub async fn upload(&self, download: &Download, filename: impl AsRef<Path>) -> Result<String> {
        self.upload_with(&S3Uploader::new(), download, filename)
            .await
    }

    /// Upload through a caller-supplied delegate.
    ///
    /// # Errors
    /// Same as [`upload`](Self::upload).
    pub async fn upload_with<U: Uploader>(
        &self,
        uploader: &U,
        download: &Download,
        filename: impl AsRef<Path>,
    ) -> Result<String> {
        let filename = filename.as_ref();
        download.s3_grant()?;
        ensure_readable_file(filename)?;
        uploader.send(download, filename).await
    }

    fn build(
        &self,
        method: Method,
        template: &str,
        extra: &[(&str, &str)],
        params: Params,
    ) -> Result<RequestSpec> {
        let mut path_params = vec![("owner", self.owner.as_str()), ("repo", self.repo.as_str())];
        path_params.extend_from_slice(extra);
        RequestSpec::build(method, template, &path_params, &[], &[], params)
    }
}

fn ensure_readable_file(filename: &Path) -> Result<()> {
    match std::fs::metadata(filename) {
        Ok(metadata) if metadata.is_file() => Ok(()),
        _ => Err(Error::InvalidArgument(format!(
            "upload source `{}` is not a readable file",
            filename.display()
        ))),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::fs;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use tempfile::TempDir;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::auth::Credentials;

    /// Uploader double that counts invocations and returns a fixed body.
    #[derive(Default)]
    struct StubUploader {
        calls: AtomicUsize,
    }

    impl Uploader for StubUploader {
        async fn send(&self, _download: &Download, _filename: &Path) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok("success".to_string())
        }
    }

    fn http_client(base_url: &str) -> Client {
        Client::with_base_url(Credentials::token("t"), base_url).unwrap()
    }

    fn grantable_download(s3_url: &str) -> Download {
        Download {
            id: 1,
            name: Some("archive.tar.gz".into()),
            size: Some(1024),
            mime_type: Some("application/x-gzip".into()),
            path: Some("downloads/peter/hub/archive.tar.gz".into()),
            acl: Some("public-read".into()),
            accesskeyid: Some("AKIA123".into()),
            policy: Some("ewogICJl...".into()),
            signature: Some("sig==".into()),
            s3_url: Some(s3_url.into()),
            ..Download::default()
        }
    }

    fn temp_upload_file(dir: &TempDir) -> std::path::PathBuf {
        let file = dir.path().join("archive.tar.gz");
        fs::write(&file, b"payload").unwrap();
        file
    }

    // === REST operations ===

    #[tokio::test]
    async fn test_create_posts_required_params() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/repos/peter/hub/downloads"))
            .and(body_json(serde_json::json!({
                "name": "archive.tar.gz",
                "size": 1024
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
                "id": 1,
                "name": "archive.tar.gz",
                "size": 1024,
                "s3_url": "https://github.s3.amazonaws.com/"
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = http_client(&mock_server.uri());
        let download = client
            .downloads("peter", "hub")
            .create(CreateDownload::new("archive.tar.gz".into(), 1024))
            .await
            .unwrap();

        assert_eq!(download.id, 1);
        assert_eq!(download.s3_url.as_deref(), Some("https://github.s3.amazonaws.com/"));
    }

    #[tokio::test]
    async fn test_list_downloads() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/repos/peter/hub/downloads"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                { "id": 1, "name": "a.txt", "size": 10 },
                { "id": 2, "name": "b.txt", "size": 20 }
            ])))
            .mount(&mock_server)
            .await;

        let client = http_client(&mock_server.uri());
        let downloads = client.downloads("peter", "hub").list().await.unwrap();

        assert_eq!(downloads.len(), 2);
        assert_eq!(downloads[1].name.as_deref(), Some("b.txt"));
    }

    #[tokio::test]
    async fn test_get_download() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/repos/peter/hub/downloads/7"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": 7,
                "name": "notes.txt",
                "size": 12
            })))
            .mount(&mock_server)
            .await;

        let client = http_client(&mock_server.uri());
        let download = client.downloads("peter", "hub").get(7).await.unwrap();

        assert_eq!(download.id, 7);
    }

    #[tokio::test]
    async fn test_delete_download() {
        let mock_server = MockServer::start().await;

        Mock::given(method("DELETE"))
            .and(path("/repos/peter/hub/downloads/7"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = http_client(&mock_server.uri());
        let response = client.downloads("peter", "hub").delete(7).await.unwrap();

        assert_eq!(response.status(), 204);
    }

    // === Upload delegation ===

    #[tokio::test]
    async fn test_upload_incomplete_grant_makes_no_delegate_call() {
        let temp = TempDir::new().unwrap();
        let file = temp_upload_file(&temp);

        let client = http_client("https://api.example.com");
        let uploader = StubUploader::default();
        let mut download = grantable_download("https://github.s3.amazonaws.com/");
        download.signature = None;

        let result = client
            .downloads("peter", "hub")
            .upload_with(&uploader, &download, &file)
            .await;

        assert!(matches!(result, Err(Error::InvalidArgument(_))));
        assert_eq!(uploader.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_upload_rejects_non_file_source() {
        let temp = TempDir::new().unwrap();

        let client = http_client("https://api.example.com");
        let uploader = StubUploader::default();
        let download = grantable_download("https://github.s3.amazonaws.com/");

        // A directory has no byte stream to read.
        let result = client
            .downloads("peter", "hub")
            .upload_with(&uploader, &download, temp.path())
            .await;

        assert!(matches!(result, Err(Error::InvalidArgument(_))));
        assert_eq!(uploader.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_upload_returns_delegate_body_unchanged() {
        let temp = TempDir::new().unwrap();
        let file = temp_upload_file(&temp);

        let client = http_client("https://api.example.com");
        let uploader = StubUploader::default();
        let download = grantable_download("https://github.s3.amazonaws.com/");

        let body = client
            .downloads("peter", "hub")
            .upload_with(&uploader, &download, &file)
            .await
            .unwrap();

        assert_eq!(body, "success");
        assert_eq!(uploader.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_s3_uploader_posts_multipart_form() {
        let temp = TempDir::new().unwrap();
        let file = temp_upload_file(&temp);

        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(201).set_body_string("success"))
            .expect(1)
            .mount(&mock_server)
            .await;

        let download = grantable_download(&format!("{}/", mock_server.uri()));
        let uploader = S3Uploader::new();

        let body = uploader.send(&download, &file).await.unwrap();
        assert_eq!(body, "success");
    }

    #[tokio::test]
    async fn test_s3_uploader_surfaces_rejection() {
        let temp = TempDir::new().unwrap();
        let file = temp_upload_file(&temp);

        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(403).set_body_string("SignatureDoesNotMatch"))
            .mount(&mock_server)
            .await;

        let download = grantable_download(&format!("{}/", mock_server.uri()));
        let uploader = S3Uploader::new();

        let err = uploader.send(&download, &file).await.unwrap_err();
        assert!(matches!(
            err,
            Error::Api { status: 403, ref message } if message == "SignatureDoesNotMatch"
        ));
    }
}
