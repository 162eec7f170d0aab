// src/fetch.rs
// =============================================================================
// This module talks HTTP for the rest of the program.
//
// Two operations:
// - get: download a URL into memory (pages)
// - download: download a URL straight into a file (images, attachments)
//
// A non-2xx answer counts as a failure, the same way a timeout or a refused
// connection does. download() does not create directories; whoever picks the
// destination is responsible for that.
// =============================================================================

use reqwest::Client;
use std::path::Path;
use std::time::Duration;

use crate::error::FetchError;

pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    // Creates the HTTP client shared by every request of the crawl
    //
    // Client is reused for all requests (connection pooling), so this is
    // called once per run.
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Fetcher { client })
    }

    pub async fn get(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(response.bytes().await?.to_vec())
    }

    // Downloads `url` and writes the body to `dest`, replacing any existing file
    //
    // Returns: the number of bytes written
    pub async fn download(&self, url: &str, dest: &Path) -> Result<usize, FetchError> {
        let body = self.get(url).await?;

        tokio::fs::write(dest, &body)
            .await
            .map_err(|source| FetchError::Write {
                path: dest.to_path_buf(),
                source,
            })?;

        Ok(body.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::{
        matchers::{method, path},
        Mock, MockServer, ResponseTemplate,
    };

    fn fetcher() -> Fetcher {
        Fetcher::new(Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_get_returns_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/page"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
            .mount(&server)
            .await;

        let body = fetcher().get(&format!("{}/page", server.uri())).await.unwrap();
        assert_eq!(body, b"<html></html>");
    }

    #[tokio::test]
    async fn test_get_fails_on_error_status() {
        let server = MockServer::start().await;

        let result = fetcher().get(&format!("{}/missing", server.uri())).await;
        assert!(matches!(result, Err(FetchError::Status { status: 404, .. })));
    }

    #[tokio::test]
    async fn test_download_writes_file() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/digitalAssets/1/logo.png"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0x89, b'P', b'N', b'G']))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("logo.png");
        let written = fetcher()
            .download(&format!("{}/digitalAssets/1/logo.png", server.uri()), &dest)
            .await
            .unwrap();

        assert_eq!(written, 4);
        assert_eq!(std::fs::read(&dest).unwrap(), vec![0x89, b'P', b'N', b'G']);
    }

    #[tokio::test]
    async fn test_download_does_not_create_directories() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("x"))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("files").join("x.txt");
        let result = fetcher().download(&format!("{}/x.txt", server.uri()), &dest).await;

        assert!(matches!(result, Err(FetchError::Write { .. })));
    }
}
