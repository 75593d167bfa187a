// components/song_metadata/src/thumbnail.rs
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("failed to fetch {url}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to fetch {url}: HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("failed to store image at {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl FetchError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        FetchError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

#[async_trait]
pub trait ThumbnailFetcher {
    /// Download the image at `url` to `dest`, returning where it was stored
    async fn fetch(&self, url: &str, dest: &Path) -> Result<PathBuf, FetchError>;
}

pub struct HttpThumbnailFetcher {
    http_client: reqwest::Client,
}

impl HttpThumbnailFetcher {
    pub fn new(http_client: reqwest::Client) -> Self {
        Self { http_client }
    }
}

#[async_trait]
impl ThumbnailFetcher for HttpThumbnailFetcher {
    async fn fetch(&self, url: &str, dest: &Path) -> Result<PathBuf, FetchError> {
        tracing::debug!(url, dest = %dest.display(), "Fetching thumbnail");

        let request_error = |source| FetchError::Request {
            url: url.to_string(),
            source,
        };

        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(request_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let image = response.bytes().await.map_err(request_error)?;

        if let Some(parent) = dest.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| FetchError::io(parent, e))?;
        }
        tokio::fs::write(dest, &image)
            .await
            .map_err(|e| FetchError::io(dest, e))?;

        Ok(dest.to_path_buf())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_server::{client, serve_once};
    use assert_matches::assert_matches;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_fetch_writes_image_and_creates_directory() {
        let server = serve_once("200 OK", b"\xFF\xD8\xFFjpeg".to_vec()).await;
        let temp_dir = TempDir::new().unwrap();
        let dest = temp_dir.path().join("thumb").join("abc.jpg");

        let fetcher = HttpThumbnailFetcher::new(client());
        let url = format!("{}/vi/abc/0.jpg", server.base_url);
        let stored = fetcher.fetch(&url, &dest).await.unwrap();

        assert_eq!(stored, dest);
        assert_eq!(std::fs::read(&dest).unwrap(), b"\xFF\xD8\xFFjpeg");
        assert!(server.request_line().await.starts_with("GET /vi/abc/0.jpg "));
    }

    #[tokio::test]
    async fn test_fetch_rejects_error_status() {
        let server = serve_once("404 Not Found", Vec::new()).await;
        let temp_dir = TempDir::new().unwrap();
        let dest = temp_dir.path().join("abc.jpg");

        let fetcher = HttpThumbnailFetcher::new(client());
        let url = format!("{}/missing.jpg", server.base_url);

        assert_matches!(
            fetcher.fetch(&url, &dest).await,
            Err(FetchError::Status { status: 404, .. })
        );
        assert!(!dest.exists());
    }
}
