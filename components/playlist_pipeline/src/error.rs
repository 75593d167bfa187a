// components/playlist_pipeline/src/error.rs
use media_downloader::{DownloadError, TranscodeError};
use mp3_tagger::TagError;
use song_metadata::ResolveError;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Why a single video did not make it into the library
#[derive(Debug, Error)]
pub enum ItemError {
    #[error("download failed")]
    DownloadFailed(#[source] DownloadError),

    #[error("transcode failed")]
    TranscodeFailed(#[source] TranscodeError),

    #[error("metadata unavailable")]
    MetadataUnavailable(#[source] ResolveError),

    #[error("tag write failed")]
    TagWriteFailed(#[source] TagError),

    #[error("failed to store {}", .path.display())]
    StoreFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors that stop the whole run
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("failed to prepare directory {}", .path.display())]
    Staging {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(
        "temp directory {} overlaps output directory {}",
        .temp.display(),
        .output.display()
    )]
    TempDirOverlapsOutput { temp: PathBuf, output: PathBuf },

    #[error("temp directory {} would remove a file system root", .0.display())]
    TempDirIsRoot(PathBuf),
}

impl PipelineError {
    pub(crate) fn staging(path: &Path, source: std::io::Error) -> Self {
        PipelineError::Staging {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// An error and all its causes on one line, separated by `": "`
pub fn error_chain(error: &dyn std::error::Error) -> String {
    let mut line = error.to_string();
    let mut cause = error.source();
    while let Some(e) = cause {
        line.push_str(": ");
        line.push_str(&e.to_string());
        cause = e.source();
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use video_primitives::VideoId;

    #[test]
    fn test_chain_names_every_cause_once() {
        let error = ItemError::DownloadFailed(DownloadError::DownloadFailed {
            video: VideoId::parse("gone").unwrap(),
            reason: "private video".to_string(),
        });

        assert_eq!(
            error_chain(&error),
            "download failed: Download of gone failed: private video"
        );
    }

    #[test]
    fn test_chain_through_transparent_io() {
        let error = ItemError::TranscodeFailed(TranscodeError::IoError(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "denied",
        )));

        assert_eq!(error_chain(&error), "transcode failed: denied");
    }
}
