// components/playlist_pipeline/src/config.rs
use crate::error::PipelineError;
use std::path::{Component, Path, PathBuf};

pub const DEFAULT_VIDEO_DIR: &str = "mp4";
pub const DEFAULT_THUMBNAIL_DIR: &str = "thumb";
pub const DEFAULT_OUTPUT_DIR: &str = "mp3";

/// Directories used by one pipeline run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Raw downloads, removed when the run ends
    pub temp_video_dir: PathBuf,

    /// Cover images, removed when the run ends
    pub temp_thumbnail_dir: PathBuf,

    /// Tagged MP3 files, kept
    pub output_dir: PathBuf,
}

impl PipelineConfig {
    /// The default layout below `base`
    pub fn rooted_at(base: impl AsRef<Path>) -> Self {
        let base = base.as_ref();
        Self {
            temp_video_dir: base.join(DEFAULT_VIDEO_DIR),
            temp_thumbnail_dir: base.join(DEFAULT_THUMBNAIL_DIR),
            output_dir: base.join(DEFAULT_OUTPUT_DIR),
        }
    }

    /// Both directories that cleanup removes
    pub fn temp_dirs(&self) -> [&Path; 2] {
        [&self.temp_video_dir, &self.temp_thumbnail_dir]
    }

    /// Reject layouts where wiping a temp directory would touch the output
    ///
    /// Temp directories are removed recursively, so neither may be a file
    /// system root, equal the output directory, contain it or live inside it.
    pub fn validate(&self) -> Result<(), PipelineError> {
        let output = lexical_absolute(&self.output_dir);

        for temp in self.temp_dirs() {
            let absolute = lexical_absolute(temp);
            if absolute.parent().is_none() {
                return Err(PipelineError::TempDirIsRoot(temp.to_path_buf()));
            }
            if output.starts_with(&absolute) || absolute.starts_with(&output) {
                return Err(PipelineError::TempDirOverlapsOutput {
                    temp: temp.to_path_buf(),
                    output: self.output_dir.clone(),
                });
            }
        }

        Ok(())
    }
}

/// Absolute form of `path` with `.` and `..` resolved without touching the disk
fn lexical_absolute(path: &Path) -> PathBuf {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        match std::env::current_dir() {
            Ok(cwd) => cwd.join(path),
            Err(_) => path.to_path_buf(),
        }
    };

    let mut normal = PathBuf::new();
    for component in joined.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normal.pop();
            }
            other => normal.push(other),
        }
    }
    normal
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            temp_video_dir: PathBuf::from(DEFAULT_VIDEO_DIR),
            temp_thumbnail_dir: PathBuf::from(DEFAULT_THUMBNAIL_DIR),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
        }
    }
}
