// components/playlist_pipeline/src/staging.rs
use crate::config::PipelineConfig;
use crate::error::PipelineError;
use std::io::ErrorKind;
use std::path::Path;

/// Creates and removes the working directories of a run
pub struct Staging<'a> {
    config: &'a PipelineConfig,
}

impl<'a> Staging<'a> {
    pub fn new(config: &'a PipelineConfig) -> Self {
        Self { config }
    }

    /// Clear leftovers from an earlier run and create all directories
    pub async fn prepare(&self) -> Result<(), PipelineError> {
        for dir in self.config.temp_dirs() {
            remove_dir(dir).await.map_err(|e| PipelineError::staging(dir, e))?;
        }

        for dir in [
            self.config.temp_video_dir.as_path(),
            self.config.temp_thumbnail_dir.as_path(),
            self.config.output_dir.as_path(),
        ] {
            tokio::fs::create_dir_all(dir)
                .await
                .map_err(|e| PipelineError::staging(dir, e))?;
        }

        Ok(())
    }

    /// Remove the temp directories; problems are logged, never returned
    pub async fn cleanup(&self) {
        for dir in self.config.temp_dirs() {
            match remove_dir(dir).await {
                Ok(()) => tracing::debug!(dir = %dir.display(), "Removed temp directory"),
                Err(e) => tracing::warn!(
                    dir = %dir.display(),
                    error = %e,
                    "Could not remove temp directory"
                ),
            }
        }
    }
}

/// Move a finished file into place, copying when a rename is not possible
///
/// A partially copied destination is removed again.
pub(crate) async fn move_file(from: &Path, to: &Path) -> std::io::Result<()> {
    if tokio::fs::rename(from, to).await.is_ok() {
        return Ok(());
    }

    // rename fails across file systems
    if let Err(e) = tokio::fs::copy(from, to).await {
        if let Err(remove) = tokio::fs::remove_file(to).await {
            tracing::debug!(path = %to.display(), error = %remove, "No partial copy to remove");
        }
        return Err(e);
    }
    tokio::fs::remove_file(from).await
}

/// Remove a directory tree, treating an absent directory as removed
async fn remove_dir(dir: &Path) -> std::io::Result<()> {
    match tokio::fs::remove_dir_all(dir).await {
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        result => result,
    }
}
