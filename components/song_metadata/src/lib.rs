// components/song_metadata/src/lib.rs
//! Song metadata for downloaded videos
//!
//! Parses artist and title out of video display names and resolves the
//! metadata that gets embedded in the audio file, optionally enriched by a
//! remote lookup (Musixmatch).

mod musixmatch;
mod resolver;
mod thumbnail;
mod title;

#[cfg(test)]
mod test_server;

use std::time::Duration;

pub use musixmatch::{
    parse_search_response, LookupError, MetadataService, MusixmatchClient, SearchResponse,
    TrackMatch,
};
pub use resolver::{MetadataResolver, ResolveError, ResolvedMetadata};
pub use thumbnail::{FetchError, HttpThumbnailFetcher, ThumbnailFetcher};
pub use title::{
    clean_title, display_stem, normalize, output_file_name, ParsedTitle, UNKNOWN_ARTIST,
};

const USER_AGENT: &str = concat!("yt-playlist-mp3/", env!("CARGO_PKG_VERSION"));
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP client shared by the metadata service and the thumbnail fetcher
pub fn http_client() -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(REQUEST_TIMEOUT)
        .build()
}
