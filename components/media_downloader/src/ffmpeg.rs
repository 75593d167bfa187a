// components/media_downloader/src/ffmpeg.rs
use crate::types::{TranscodeError, Transcoder};
use async_trait::async_trait;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;

const FFMPEG: &str = "ffmpeg";

/// Audio extraction through an `ffmpeg` subprocess
pub struct Ffmpeg {
    program: PathBuf,
}

impl Ffmpeg {
    pub fn new() -> Self {
        Self {
            program: PathBuf::from(FFMPEG),
        }
    }

    /// Use a specific converter executable
    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn program_name(&self) -> String {
        self.program.display().to_string()
    }

    fn arguments(input: &Path, output: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = ["-hide_banner", "-loglevel", "error", "-nostdin", "-y", "-i"]
            .iter()
            .map(OsString::from)
            .collect();
        args.push(input.as_os_str().to_owned());
        args.push(OsString::from("-vn"));
        args.push(output.as_os_str().to_owned());
        args
    }
}

impl Default for Ffmpeg {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transcoder for Ffmpeg {
    async fn check_available(&self) -> Result<(), TranscodeError> {
        which::which(&self.program)
            .map(|_| ())
            .map_err(|_| TranscodeError::ConverterNotFound(self.program_name()))
    }

    async fn transcode(&self, input: &Path, output: &Path) -> Result<(), TranscodeError> {
        tracing::debug!(
            input = %input.display(),
            output = %output.display(),
            "Transcoding"
        );

        let result = Command::new(&self.program)
            .args(Self::arguments(input, output))
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => {
                    TranscodeError::ConverterNotFound(self.program_name())
                }
                _ => TranscodeError::IoError(e),
            })?;

        if !result.status.success() {
            return Err(TranscodeError::ConverterFailed {
                program: self.program_name(),
                status: result.status,
                stderr: String::from_utf8_lossy(&result.stderr).trim().to_string(),
            });
        }

        // A zero exit status alone does not prove that audio was written
        let written = tokio::fs::metadata(output)
            .await
            .map(|m| m.len())
            .unwrap_or(0);
        if written == 0 {
            return Err(TranscodeError::EmptyOutput(output.to_path_buf()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use tempfile::TempDir;

    #[test]
    fn test_arguments_silence_logging_and_drop_video() {
        let args = Ffmpeg::arguments(Path::new("in.mp4"), Path::new("out.mp3"));
        let args: Vec<_> = args.iter().map(|a| a.to_string_lossy().into_owned()).collect();
        assert_eq!(
            args,
            vec![
                "-hide_banner", "-loglevel", "error", "-nostdin", "-y", "-i", "in.mp4", "-vn",
                "out.mp3"
            ]
        );
    }

    #[tokio::test]
    async fn test_missing_converter() {
        let temp_dir = TempDir::new().unwrap();
        let ffmpeg = Ffmpeg::with_program("ffmpeg-that-does-not-exist-anywhere");

        assert_matches!(
            ffmpeg.check_available().await,
            Err(TranscodeError::ConverterNotFound(_))
        );
        assert_matches!(
            ffmpeg
                .transcode(&temp_dir.path().join("in.mp4"), &temp_dir.path().join("out.mp3"))
                .await,
            Err(TranscodeError::ConverterNotFound(_))
        );
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_non_zero_exit_is_a_failure() {
        let temp_dir = TempDir::new().unwrap();
        let ffmpeg = Ffmpeg::with_program("false");

        assert_matches!(
            ffmpeg
                .transcode(&temp_dir.path().join("in.mp4"), &temp_dir.path().join("out.mp3"))
                .await,
            Err(TranscodeError::ConverterFailed { .. })
        );
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_success_without_output_is_a_failure() {
        let temp_dir = TempDir::new().unwrap();
        let ffmpeg = Ffmpeg::with_program("true");
        let output = temp_dir.path().join("out.mp3");

        assert_matches!(
            ffmpeg.transcode(&temp_dir.path().join("in.mp4"), &output).await,
            Err(TranscodeError::EmptyOutput(path)) if path == output
        );
    }
}
