// components/media_downloader/src/lib.rs
mod ffmpeg;
mod types;
mod utils;
mod ytdlp;

use std::path::Path;
use std::sync::Arc;
use url::Url;
use video_primitives::VideoId;

pub use ffmpeg::Ffmpeg;
pub use types::{DownloadError, RawMedia, TranscodeError, Transcoder, VideoSource};
pub use utils::dedup_ids;
pub use ytdlp::YtDlp;

pub struct MediaDownloader {
    source: Arc<dyn VideoSource + Send + Sync>,
}

impl MediaDownloader {
    /// Create a new MediaDownloader backed by yt-dlp
    pub async fn new() -> Result<Self, DownloadError> {
        Self::new_with_source(Arc::new(YtDlp::new())).await
    }

    /// Create a new MediaDownloader with a specific source implementation
    pub async fn new_with_source(
        source: Arc<dyn VideoSource + Send + Sync>,
    ) -> Result<Self, DownloadError> {
        source.check_available().await?;
        Ok(Self { source })
    }

    /// List the videos of a playlist, deduplicated in playlist order
    ///
    /// An unparseable URL or a playlist without videos is an error.
    pub async fn playlist(&self, url: &str) -> Result<Vec<VideoId>, DownloadError> {
        let url = Url::parse(url).map_err(|e| DownloadError::InvalidUrl(e.to_string()))?;

        let ids = dedup_ids(self.source.fetch_playlist(&url).await?);
        if ids.is_empty() {
            return Err(DownloadError::InvalidPlaylist(format!(
                "no videos found at {}",
                url
            )));
        }

        tracing::info!(count = ids.len(), %url, "Enumerated playlist");
        Ok(ids)
    }

    /// Download a single video into `dest_dir`, creating it if needed
    pub async fn download(
        &self,
        video: &VideoId,
        dest_dir: &Path,
    ) -> Result<RawMedia, DownloadError> {
        tokio::fs::create_dir_all(dest_dir).await?;
        self.source.download_video(video, dest_dir).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use tempfile::TempDir;
    use ytdlp::stub::VideoSourceStub;

    async fn downloader(playlist: Vec<&'static str>) -> MediaDownloader {
        MediaDownloader::new_with_source(Arc::new(VideoSourceStub { playlist }))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_playlist_is_deduplicated() {
        let downloader = downloader(vec!["a", "b", "a"]).await;
        let ids = downloader
            .playlist("https://www.youtube.com/playlist?list=PL1")
            .await
            .unwrap();
        let ids: Vec<_> = ids.iter().map(VideoId::as_str).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_empty_playlist_is_invalid() {
        let downloader = downloader(vec![]).await;
        assert_matches!(
            downloader
                .playlist("https://www.youtube.com/playlist?list=PL1")
                .await,
            Err(DownloadError::InvalidPlaylist(_))
        );
    }

    #[tokio::test]
    async fn test_invalid_url() {
        let downloader = downloader(vec!["a"]).await;
        assert_matches!(
            downloader.playlist("not a url").await,
            Err(DownloadError::InvalidUrl(_))
        );
    }

    #[tokio::test]
    async fn test_download_creates_destination() {
        let temp_dir = TempDir::new().unwrap();
        let dest = temp_dir.path().join("mp4");
        let downloader = downloader(vec![]).await;

        let video = VideoId::parse("abc").unwrap();
        let media = downloader.download(&video, &dest).await.unwrap();

        assert_eq!(media.path, dest.join("abc.mp4"));
        assert_eq!(media.suggested_name, "Test Artist - Test Song");
        assert!(media.path.is_file());
    }
}
