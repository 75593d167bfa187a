// components/media_downloader/src/ytdlp.rs
use crate::types::{DownloadError, RawMedia, VideoSource};
use crate::utils::{find_downloaded_file, parse_id_lines, parse_printed_path};
use async_trait::async_trait;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::process::Output;
use tokio::process::Command;
use url::Url;
use video_primitives::VideoId;

const YT_DLP: &str = "yt-dlp";

/// Prefer a progressive mp4 (audio and video in one file), then anything with audio
const VIDEO_FORMAT: &str = "best[ext=mp4]/bestaudio/best";

pub struct YtDlp {
    program: PathBuf,
}

impl YtDlp {
    pub fn new() -> Self {
        Self {
            program: PathBuf::from(YT_DLP),
        }
    }

    /// Use a specific yt-dlp executable
    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    async fn run(&self, command: &mut Command) -> Result<Output, DownloadError> {
        command.output().await.map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => DownloadError::DependencyNotFound(YT_DLP),
            _ => DownloadError::IoError(e),
        })
    }

    async fn fetch_info(&self, video: &VideoId) -> Result<YtDlpInfo, DownloadError> {
        let output = self
            .run(
                Command::new(&self.program)
                    .arg("--dump-json")
                    .arg("--no-download")
                    .arg("--no-playlist")
                    .arg("--no-warnings")
                    .arg(video.watch_url()),
            )
            .await?;

        if !output.status.success() {
            return Err(DownloadError::DownloadFailed {
                video: video.clone(),
                reason: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let info: YtDlpInfo = serde_json::from_slice(&output.stdout).map_err(|e| {
            DownloadError::DownloadFailed {
                video: video.clone(),
                reason: format!("unreadable video info: {}", e),
            }
        })?;

        tracing::debug!(?info, "Fetched video info");
        Ok(info)
    }
}

impl Default for YtDlp {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VideoSource for YtDlp {
    async fn check_available(&self) -> Result<(), DownloadError> {
        which::which(&self.program)
            .map(|_| ())
            .map_err(|_| DownloadError::DependencyNotFound(YT_DLP))
    }

    async fn fetch_playlist(&self, url: &Url) -> Result<Vec<VideoId>, DownloadError> {
        tracing::debug!(%url, "Listing playlist");

        let output = self
            .run(
                Command::new(&self.program)
                    .arg("--flat-playlist")
                    .arg("--no-warnings")
                    .arg("--print")
                    .arg("id")
                    .arg(url.as_str()),
            )
            .await?;

        if !output.status.success() {
            return Err(DownloadError::InvalidPlaylist(
                String::from_utf8_lossy(&output.stderr).trim().to_string(),
            ));
        }

        Ok(parse_id_lines(&String::from_utf8_lossy(&output.stdout)))
    }

    async fn download_video(
        &self,
        video: &VideoId,
        dest_dir: &Path,
    ) -> Result<RawMedia, DownloadError> {
        let info = self.fetch_info(video).await?;

        // Name the staged file after the video id so items never collide
        let template = dest_dir.join(format!("{}.%(ext)s", video));
        tracing::debug!(template = %template.display(), "Downloading video");

        let output = self
            .run(
                Command::new(&self.program)
                    .arg("--no-playlist")
                    .arg("--no-warnings")
                    .arg("--format")
                    .arg(VIDEO_FORMAT)
                    .arg("--output")
                    .arg(&template)
                    .arg("--print")
                    .arg("after_move:filepath")
                    .arg("--no-simulate")
                    .arg(video.watch_url()),
            )
            .await?;

        if !output.status.success() {
            return Err(DownloadError::DownloadFailed {
                video: video.clone(),
                reason: format!(
                    "yt-dlp exited with status {}: {}",
                    output.status,
                    String::from_utf8_lossy(&output.stderr).trim()
                ),
            });
        }

        let printed = parse_printed_path(&String::from_utf8_lossy(&output.stdout))
            .filter(|path| path.is_file());
        let path = match printed {
            Some(path) => path,
            None => find_downloaded_file(dest_dir, video)?.ok_or_else(|| {
                DownloadError::DownloadFailed {
                    video: video.clone(),
                    reason: format!("no downloaded file found in {}", dest_dir.display()),
                }
            })?,
        };

        Ok(RawMedia {
            path,
            suggested_name: info.title,
        })
    }
}

#[derive(Debug, Deserialize)]
struct YtDlpInfo {
    title: String,
}

#[cfg(test)]
pub mod stub {
    use super::*;

    pub struct VideoSourceStub {
        pub playlist: Vec<&'static str>,
    }

    #[async_trait]
    impl VideoSource for VideoSourceStub {
        async fn check_available(&self) -> Result<(), DownloadError> {
            Ok(())
        }

        async fn fetch_playlist(&self, _url: &Url) -> Result<Vec<VideoId>, DownloadError> {
            Ok(self
                .playlist
                .iter()
                .map(|raw| VideoId::parse(raw).unwrap())
                .collect())
        }

        async fn download_video(
            &self,
            video: &VideoId,
            dest_dir: &Path,
        ) -> Result<RawMedia, DownloadError> {
            let path = dest_dir.join(video.file_name("mp4"));
            tokio::fs::write(&path, b"not really a video").await?;
            Ok(RawMedia {
                path,
                suggested_name: "Test Artist - Test Song".to_string(),
            })
        }
    }
}
