// components/media_downloader/src/types.rs
use std::path::{Path, PathBuf};
use std::process::ExitStatus;
use thiserror::Error;
use url::Url;
use video_primitives::VideoId;

#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("Required dependency not found: {0}")]
    DependencyNotFound(&'static str),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Download of {video} failed: {reason}")]
    DownloadFailed { video: VideoId, reason: String },

    #[error("Invalid playlist: {0}")]
    InvalidPlaylist(String),

    #[error(transparent)]
    IoError(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum TranscodeError {
    #[error("Converter not found: {0}")]
    ConverterNotFound(String),

    #[error("{program} exited with {status}: {stderr}")]
    ConverterFailed {
        program: String,
        status: ExitStatus,
        stderr: String,
    },

    #[error("Converter produced no output at {}", .0.display())]
    EmptyOutput(PathBuf),

    #[error(transparent)]
    IoError(#[from] std::io::Error),
}

/// A downloaded, not yet transcoded, video file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawMedia {
    /// Where the downloaded file lives in the staging directory
    pub path: PathBuf,

    /// Display name suggested by the platform (the video title)
    pub suggested_name: String,
}

#[async_trait::async_trait]
pub trait VideoSource {
    /// Check if the source is available and has all required dependencies
    async fn check_available(&self) -> Result<(), DownloadError>;

    /// Fetch the ids of all videos in a playlist, in playlist order
    async fn fetch_playlist(&self, url: &Url) -> Result<Vec<VideoId>, DownloadError>;

    /// Download a single video into `dest_dir`
    async fn download_video(
        &self,
        video: &VideoId,
        dest_dir: &Path,
    ) -> Result<RawMedia, DownloadError>;
}

#[async_trait::async_trait]
pub trait Transcoder {
    /// Check if the external converter can be found
    async fn check_available(&self) -> Result<(), TranscodeError>;

    /// Convert `input` into an audio file at `output`
    async fn transcode(&self, input: &Path, output: &Path) -> Result<(), TranscodeError>;
}
