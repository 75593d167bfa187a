// components/song_metadata/src/resolver.rs
use crate::musixmatch::{MetadataService, TrackMatch};
use crate::thumbnail::{FetchError, ThumbnailFetcher};
use crate::title::{display_stem, ParsedTitle};
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use video_primitives::VideoId;

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("metadata unavailable for {video}")]
    MetadataUnavailable {
        video: VideoId,
        #[source]
        source: FetchError,
    },
}

/// Everything that ends up in the tag container of one track
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedMetadata {
    pub thumbnail_path: PathBuf,
    pub title: String,
    pub artist: String,
    /// Empty when only platform metadata was available
    pub album: String,
}

/// Chooses between platform metadata and a remote lookup
///
/// The locally parsed title always wins and the parsed artist wins unless it
/// is unknown. A remote match only contributes album, cover art and, for
/// unknown artists, the artist name.
pub struct MetadataResolver {
    thumbnail_dir: PathBuf,
    fetcher: Arc<dyn ThumbnailFetcher + Send + Sync>,
    service: Option<Arc<dyn MetadataService + Send + Sync>>,
}

impl MetadataResolver {
    /// A resolver that only uses platform metadata
    pub fn new(
        thumbnail_dir: impl Into<PathBuf>,
        fetcher: Arc<dyn ThumbnailFetcher + Send + Sync>,
    ) -> Self {
        Self {
            thumbnail_dir: thumbnail_dir.into(),
            fetcher,
            service: None,
        }
    }

    /// Also consult a metadata service before falling back to the platform
    pub fn with_service(mut self, service: Arc<dyn MetadataService + Send + Sync>) -> Self {
        self.service = Some(service);
        self
    }

    pub fn uses_remote_lookup(&self) -> bool {
        self.service.is_some()
    }

    /// Resolve the metadata for one video
    ///
    /// `display_name` is the name the title was parsed from; it is used as
    /// the search query. Only a failing thumbnail download is an error.
    pub async fn resolve(
        &self,
        video: &VideoId,
        display_name: &str,
        parsed: &ParsedTitle,
    ) -> Result<ResolvedMetadata, ResolveError> {
        let remote = match &self.service {
            Some(service) => self.lookup(service.as_ref(), display_stem(display_name)).await,
            None => None,
        };

        let platform_thumbnail = video.thumbnail_url();
        let (cover_url, artist, album) = match remote {
            Some(track) => {
                let artist = if parsed.has_unknown_artist() && !track.artist.is_empty() {
                    track.artist
                } else {
                    parsed.artist.clone()
                };
                (
                    track.cover_art_url.unwrap_or(platform_thumbnail),
                    artist,
                    track.album,
                )
            }
            None => (platform_thumbnail, parsed.artist.clone(), String::new()),
        };

        let dest = self.thumbnail_dir.join(video.file_name("jpg"));
        let thumbnail_path = self
            .fetcher
            .fetch(&cover_url, &dest)
            .await
            .map_err(|source| ResolveError::MetadataUnavailable {
                video: video.clone(),
                source,
            })?;

        Ok(ResolvedMetadata {
            thumbnail_path,
            title: parsed.title.clone(),
            artist,
            album,
        })
    }

    /// First match of a successful search, `None` means platform fallback
    async fn lookup(
        &self,
        service: &(dyn MetadataService + Send + Sync),
        query: &str,
    ) -> Option<TrackMatch> {
        match service.search(query).await {
            Ok(response) if response.is_success() => {
                let best = response.matches.into_iter().next();
                if best.is_none() {
                    tracing::info!(query, "No metadata match, using platform metadata");
                }
                best
            }
            Ok(response) => {
                tracing::warn!(
                    query,
                    status = response.status_code,
                    "Metadata service reported failure, using platform metadata"
                );
                None
            }
            Err(e) => {
                tracing::warn!(query, error = %e, "Metadata lookup failed, using platform metadata");
                None
            }
        }
    }
}
