// components/playlist_pipeline/src/lib.rs
//! Sequential playlist-to-MP3 pipeline
//!
//! Each video is downloaded, transcoded and tagged inside the staging
//! directory, and only a fully tagged file is moved into the output directory.
//! A failing video is recorded and the run moves on; the temp directories are
//! removed once every video has been attempted or the run aborts.

mod config;
mod error;
mod progress;
mod staging;
mod state;

use media_downloader::{MediaDownloader, Transcoder};
use mp3_tagger::TagWriter;
use song_metadata::{
    clean_title, display_stem, normalize, output_file_name, MetadataResolver, MetadataService,
    ResolvedMetadata, ThumbnailFetcher,
};
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;
use video_primitives::VideoId;

pub use config::{PipelineConfig, DEFAULT_OUTPUT_DIR, DEFAULT_THUMBNAIL_DIR, DEFAULT_VIDEO_DIR};
pub use error::{error_chain, ItemError, PipelineError};
pub use progress::{percent_complete, Progress, Silent};
use staging::move_file;
pub use staging::Staging;
pub use state::{ItemState, ItemTracker};

/// The adapters a pipeline drives
pub struct Collaborators {
    pub downloader: MediaDownloader,
    pub transcoder: Arc<dyn Transcoder + Send + Sync>,
    pub thumbnails: Arc<dyn ThumbnailFetcher + Send + Sync>,
    /// `None` disables the remote metadata lookup
    pub metadata_service: Option<Arc<dyn MetadataService + Send + Sync>>,
    pub tagger: Arc<dyn TagWriter + Send + Sync>,
}

/// A finished track
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaggedAudio {
    pub video: VideoId,
    pub path: PathBuf,
    pub metadata: ResolvedMetadata,
}

/// Outcome of a run, in playlist order
#[derive(Debug, Default)]
pub struct RunSummary {
    pub tagged: Vec<TaggedAudio>,
    pub failed: Vec<(VideoId, ItemError)>,
}

impl RunSummary {
    pub fn succeeded(&self) -> usize {
        self.tagged.len()
    }
}

/// Extension of the audio file while it is transcoded and tagged
const STAGED_EXTENSION: &str = "audio.mp3";

pub struct Pipeline {
    config: PipelineConfig,
    downloader: MediaDownloader,
    transcoder: Arc<dyn Transcoder + Send + Sync>,
    resolver: MetadataResolver,
    tagger: Arc<dyn TagWriter + Send + Sync>,
    progress: Arc<dyn Progress + Send + Sync>,
}

impl Pipeline {
    pub fn new(config: PipelineConfig, collaborators: Collaborators) -> Self {
        let mut resolver =
            MetadataResolver::new(&config.temp_thumbnail_dir, collaborators.thumbnails);
        if let Some(service) = collaborators.metadata_service {
            resolver = resolver.with_service(service);
        }

        Self {
            config,
            downloader: collaborators.downloader,
            transcoder: collaborators.transcoder,
            resolver,
            tagger: collaborators.tagger,
            progress: Arc::new(Silent),
        }
    }

    pub fn with_progress(mut self, progress: Arc<dyn Progress + Send + Sync>) -> Self {
        self.progress = progress;
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Process every video in order
    ///
    /// Only an unsafe directory layout or staging problems abort the run;
    /// per-video failures end up in the summary.
    pub async fn run(&self, videos: &[VideoId]) -> Result<RunSummary, PipelineError> {
        self.config.validate()?;

        let staging = Staging::new(&self.config);
        if let Err(e) = staging.prepare().await {
            staging.cleanup().await;
            return Err(e);
        }

        tracing::info!(
            count = videos.len(),
            remote_lookup = self.resolver.uses_remote_lookup(),
            "Starting run"
        );

        let mut summary = RunSummary::default();
        let mut claimed = HashSet::new();
        let total = videos.len();

        for (index, video) in videos.iter().enumerate() {
            self.progress.item_started(index + 1, total, video);

            match self.process(video, &mut claimed).await {
                Ok(tagged) => {
                    self.progress.item_done(&tagged);
                    summary.tagged.push(tagged);
                }
                Err(error) => {
                    self.progress.item_failed(video, &error);
                    summary.failed.push((video.clone(), error));
                }
            }
        }

        self.progress.cleanup_started();
        staging.cleanup().await;

        tracing::info!(
            succeeded = summary.succeeded(),
            failed = summary.failed.len(),
            "Run finished"
        );
        Ok(summary)
    }

    async fn process(
        &self,
        video: &VideoId,
        claimed: &mut HashSet<String>,
    ) -> Result<TaggedAudio, ItemError> {
        let mut tracker = ItemTracker::new(video);
        let result = self.process_tracked(video, claimed, &mut tracker).await;
        if let Err(error) = &result {
            tracker.fail(error_chain(error));
        }
        result
    }

    async fn process_tracked(
        &self,
        video: &VideoId,
        claimed: &mut HashSet<String>,
        tracker: &mut ItemTracker<'_>,
    ) -> Result<TaggedAudio, ItemError> {
        tracker.advance(ItemState::Downloading);
        let raw = self
            .downloader
            .download(video, &self.config.temp_video_dir)
            .await
            .map_err(ItemError::DownloadFailed)?;
        tracker.advance(ItemState::Downloaded);

        let file_name = claim_file_name(video, &raw.suggested_name, claimed);
        let staged = self.config.temp_video_dir.join(video.file_name(STAGED_EXTENSION));

        tracker.advance(ItemState::Transcoding);
        self.progress.converting(video, display_stem(&file_name));
        self.transcoder
            .transcode(&raw.path, &staged)
            .await
            .map_err(ItemError::TranscodeFailed)?;
        tracker.advance(ItemState::Transcoded);

        tracker.advance(ItemState::ResolvingMetadata);
        self.progress.tagging(video);
        let stem = display_stem(&file_name);
        let parsed = normalize(stem);
        let metadata = self
            .resolver
            .resolve(video, stem, &parsed)
            .await
            .map_err(ItemError::MetadataUnavailable)?;

        tracker.advance(ItemState::Tagging);
        self.tagger
            .write_tags(&staged, &metadata)
            .map_err(ItemError::TagWriteFailed)?;

        let output = self.config.output_dir.join(&file_name);
        move_file(&staged, &output)
            .await
            .map_err(|source| ItemError::StoreFailed {
                path: output.clone(),
                source,
            })?;
        tracker.advance(ItemState::Done);

        tracing::info!(%video, path = %output.display(), "Tagged");
        Ok(TaggedAudio {
            video: video.clone(),
            path: output,
            metadata,
        })
    }
}

/// Output file name for a video, unique within the run
///
/// A second video that cleans to an already used name gets its id appended.
fn claim_file_name(video: &VideoId, suggested_name: &str, claimed: &mut HashSet<String>) -> String {
    let cleaned = clean_title(suggested_name);
    let mut file_name = output_file_name(&cleaned);
    if claimed.contains(&file_name.to_lowercase()) {
        file_name = output_file_name(&format!("{} ({})", cleaned, video));
        tracing::debug!(%video, %file_name, "Output name already taken");
    }
    claimed.insert(file_name.to_lowercase());
    file_name
}
