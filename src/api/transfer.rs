//
//  redmine-cli
//  api/transfer.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! File upload and download helpers.
//!
//! Both operations bypass the JSON request path of [`RedmineClient::request`]:
//! uploads send raw bytes as `application/octet-stream`, and downloads return
//! raw bytes that are written straight to disk.
//!
//! # Attaching files to issues
//!
//! Redmine attaches files in two steps. The bytes are first posted to
//! `/uploads.json`, which answers with a token:
//!
//! ```json
//! {"upload": {"id": 7, "token": "7.ed32257a2ab0f7526c0d72c32994c58b"}}
//! ```
//!
//! The token is then passed in the `uploads` field of an issue create or
//! update.

use std::path::Path;

use reqwest::header::{HeaderValue, CONTENT_TYPE};
use serde_json::Value;

use super::client::{decode_body, map_status, RequestKind, API_KEY_HEADER};
use super::common::ApiError;
use super::RedmineClient;

/// Content type of upload bodies.
pub const OCTET_STREAM: &str = "application/octet-stream";

impl RedmineClient {
    /// Uploads a local file and returns the upload token response.
    ///
    /// The path is checked before any request is sent. The filename sent to
    /// Redmine defaults to the base name of `path`.
    ///
    /// # Errors
    ///
    /// - `FileNotFound` / `NotAFile` when the path is unusable
    /// - `ReadFile` when the file cannot be read
    /// - `NotFound` ("Upload endpoint not found.") on 404
    /// - `UploadRejected` on 422, typically a size limit
    /// - Any other status or transport error as for [`RedmineClient::request`]
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// # use std::path::Path;
    /// # async fn example(client: &redmine_cli::api::RedmineClient) -> Result<(), redmine_cli::api::ApiError> {
    /// let response = client.upload_file(Path::new("screenshot.png"), None).await?;
    /// println!("token: {}", response["upload"]["token"]);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn upload_file(&self, path: &Path, filename: Option<&str>) -> Result<Value, ApiError> {
        let metadata = match tokio::fs::metadata(path).await {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ApiError::FileNotFound(path.to_path_buf()))
            }
            Err(e) => {
                return Err(ApiError::ReadFile {
                    path: path.to_path_buf(),
                    source: e,
                })
            }
        };
        if !metadata.is_file() {
            return Err(ApiError::NotAFile(path.to_path_buf()));
        }

        let filename = match filename.filter(|f| !f.is_empty()) {
            Some(name) => name.to_string(),
            None => path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
        };

        let content = tokio::fs::read(path).await.map_err(|e| ApiError::ReadFile {
            path: path.to_path_buf(),
            source: e,
        })?;

        let url = self.url("/uploads.json");
        tracing::debug!("Uploading {} ({} bytes) as {}", path.display(), content.len(), filename);

        let response = self
            .http()
            .post(&url)
            .header(API_KEY_HEADER, self.api_key())
            .header(CONTENT_TYPE, HeaderValue::from_static(OCTET_STREAM))
            .query(&[("filename", filename.as_str())])
            .body(content)
            .send()
            .await
            .map_err(|e| self.transport_error(RequestKind::Upload, &url, e))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| self.transport_error(RequestKind::Upload, &url, e))?;

        if status.as_u16() >= 400 {
            return Err(map_status(status.as_u16(), &text, RequestKind::Upload));
        }

        decode_body(&text)
    }

    /// Downloads `url` into `save_path` and returns the number of bytes written.
    ///
    /// Relative URLs beginning with `/` are resolved against the base URL.
    /// Redirects are followed, which is how Redmine serves attachments kept in
    /// external storage. An existing file at `save_path` is overwritten.
    ///
    /// # Errors
    ///
    /// - `CreateDir` when the parent directory cannot be created
    /// - `NotFound` ("File not found on server.") on 404
    /// - `Http` ("Download failed") for other client errors
    /// - `WriteFile` when the content cannot be saved
    pub async fn download_file(&self, url: &str, save_path: &Path) -> Result<u64, ApiError> {
        if let Some(parent) = save_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| ApiError::CreateDir {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
        }

        let url = self.resolve_url(url);
        tracing::debug!("Downloading {} to {}", url, save_path.display());

        let response = self
            .http()
            .get(&url)
            .header(API_KEY_HEADER, self.api_key())
            .send()
            .await
            .map_err(|e| self.transport_error(RequestKind::Download, &url, e))?;

        let status = response.status();
        if status.as_u16() >= 400 {
            return Err(map_status(status.as_u16(), "", RequestKind::Download));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| self.transport_error(RequestKind::Download, &url, e))?;

        tokio::fs::write(save_path, &bytes)
            .await
            .map_err(|e| ApiError::WriteFile {
                path: save_path.to_path_buf(),
                source: e,
            })?;

        Ok(bytes.len() as u64)
    }

    /// Turns a server-relative attachment URL into an absolute one.
    pub fn resolve_url(&self, url: &str) -> String {
        if url.starts_with('/') {
            self.url(url)
        } else {
            url.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::client::tests::client_for;
    use mockito::Matcher;

    #[tokio::test]
    async fn test_upload_missing_file_sends_nothing() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/uploads.json")
            .match_query(Matcher::Any)
            .expect(0)
            .create_async()
            .await;

        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.txt");

        let client = client_for(&server);
        let err = client.upload_file(&missing, None).await.unwrap_err();

        assert!(matches!(err, ApiError::FileNotFound(_)));
        assert!(err.to_string().starts_with("File not found: "));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_upload_directory_is_rejected() {
        let server = mockito::Server::new_async().await;
        let dir = tempfile::tempdir().unwrap();

        let client = client_for(&server);
        let err = client.upload_file(dir.path(), None).await.unwrap_err();
        assert!(matches!(err, ApiError::NotAFile(_)));
    }

    #[tokio::test]
    async fn test_upload_sends_raw_bytes() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/uploads.json")
            .match_header("x-redmine-api-key", "test-key")
            .match_header("content-type", "application/octet-stream")
            .match_query(Matcher::UrlEncoded("filename".into(), "notes.txt".into()))
            .match_body("hello redmine")
            .with_status(201)
            .with_body(r#"{"upload":{"id":7,"token":"7.abc"}}"#)
            .expect(1)
            .create_async()
            .await;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, "hello redmine").unwrap();

        let client = client_for(&server);
        let value = client.upload_file(&path, None).await.unwrap();

        assert_eq!(value["upload"]["token"], "7.abc");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_upload_custom_filename_and_rejection() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/uploads.json")
            .match_query(Matcher::UrlEncoded("filename".into(), "report.pdf".into()))
            .with_status(422)
            .create_async()
            .await;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("big.bin");
        std::fs::write(&path, vec![0u8; 64]).unwrap();

        let client = client_for(&server);
        let err = client
            .upload_file(&path, Some("report.pdf"))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::UploadRejected));
        assert_eq!(err.status_code(), Some(422));
    }

    #[tokio::test]
    async fn test_download_creates_parents() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/attachments/download/3/log.txt")
            .match_header("x-redmine-api-key", "test-key")
            .with_status(200)
            .with_body("0123456789")
            .create_async()
            .await;

        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("a").join("b").join("log.txt");

        let client = client_for(&server);
        let url = format!("{}/attachments/download/3/log.txt", server.url());
        let size = client.download_file(&url, &target).await.unwrap();

        assert_eq!(size, 10);
        assert_eq!(std::fs::read_to_string(&target).unwrap(), "0123456789");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_download_relative_url_and_overwrite() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/attachments/download/4/a.txt")
            .with_status(200)
            .with_body("new")
            .create_async()
            .await;

        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("a.txt");
        std::fs::write(&target, "old content that is longer").unwrap();

        let client = client_for(&server);
        let size = client
            .download_file("/attachments/download/4/a.txt", &target)
            .await
            .unwrap();

        assert_eq!(size, 3);
        assert_eq!(std::fs::read_to_string(&target).unwrap(), "new");
    }

    #[tokio::test]
    async fn test_download_follows_redirect() {
        let mut server = mockito::Server::new_async().await;
        let redirect = server
            .mock("GET", "/attachments/download/3/a.txt")
            .with_status(302)
            .with_header("location", "/storage/a.txt")
            .create_async()
            .await;
        let storage = server
            .mock("GET", "/storage/a.txt")
            .match_header("X-Redmine-API-Key", "test-key")
            .with_status(200)
            .with_body("0123456789")
            .create_async()
            .await;

        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("a.txt");

        let client = client_for(&server);
        let size = client
            .download_file("/attachments/download/3/a.txt", &target)
            .await
            .unwrap();

        assert_eq!(size, 10);
        assert_eq!(std::fs::read_to_string(&target).unwrap(), "0123456789");
        redirect.assert_async().await;
        storage.assert_async().await;
    }

    #[tokio::test]
    async fn test_download_not_found() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/attachments/download/5/gone.txt")
            .with_status(404)
            .create_async()
            .await;

        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("gone.txt");

        let client = client_for(&server);
        let err = client
            .download_file("/attachments/download/5/gone.txt", &target)
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "File not found on server.");
        assert!(!target.exists());
    }

    #[tokio::test]
    async fn test_download_directory_failure_is_distinct() {
        let server = mockito::Server::new_async().await;
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "a file, not a directory").unwrap();

        let client = client_for(&server);
        let err = client
            .download_file("/attachments/1", &blocker.join("sub").join("x.txt"))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::CreateDir { .. }));
    }
}
