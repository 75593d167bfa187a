// components/song_metadata/src/musixmatch.rs
use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

const MUSIXMATCH_BASE_URL: &str = "http://api.musixmatch.com/ws/1.1";

/// Status code the service reports for a successful search
const STATUS_OK: u16 = 200;

#[derive(Debug, Error)]
pub enum LookupError {
    #[error(transparent)]
    Network(#[from] reqwest::Error),

    #[error(transparent)]
    Parse(#[from] serde_json::Error),
}

/// One candidate returned by a metadata search
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackMatch {
    pub artist: String,
    pub title: String,
    pub album: String,
    pub cover_art_url: Option<String>,
}

/// Result of a metadata search, best match first
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResponse {
    pub status_code: u16,
    pub matches: Vec<TrackMatch>,
}

impl SearchResponse {
    pub fn is_success(&self) -> bool {
        self.status_code == STATUS_OK
    }
}

#[async_trait]
pub trait MetadataService {
    /// Search the service for tracks matching a free-text query
    async fn search(&self, query: &str) -> Result<SearchResponse, LookupError>;
}

/// Client for the Musixmatch `track.search` endpoint
pub struct MusixmatchClient {
    http_client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl MusixmatchClient {
    pub fn new(http_client: reqwest::Client, api_key: impl Into<String>) -> Self {
        Self {
            http_client,
            base_url: MUSIXMATCH_BASE_URL.to_string(),
            api_key: api_key.into(),
        }
    }

    /// Point the client at a different API root
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }
}

#[async_trait]
impl MetadataService for MusixmatchClient {
    async fn search(&self, query: &str) -> Result<SearchResponse, LookupError> {
        let url = format!("{}/track.search", self.base_url);
        tracing::debug!(query, url = %url, "Querying Musixmatch");

        let response = self
            .http_client
            .get(&url)
            .query(&[("q_track", query), ("apikey", self.api_key.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Ok(SearchResponse {
                status_code: status.as_u16(),
                matches: Vec::new(),
            });
        }

        let body = response.bytes().await?;
        parse_search_response(&body)
    }
}

/// Decode a `track.search` envelope
///
/// The service reports errors inside a 200 response and then sends an empty
/// string or array as body, so any non-object body means no matches.
pub fn parse_search_response(json: &[u8]) -> Result<SearchResponse, LookupError> {
    let envelope: Envelope = serde_json::from_slice(json)?;
    let message = envelope.message;

    let matches = if message.body.is_object() {
        serde_json::from_value::<Body>(message.body)?
            .track_list
            .into_iter()
            .map(|entry| entry.track.into())
            .collect()
    } else {
        Vec::new()
    };

    Ok(SearchResponse {
        status_code: message.header.status_code,
        matches,
    })
}

#[derive(Debug, Deserialize)]
struct Envelope {
    message: Message,
}

#[derive(Debug, Deserialize)]
struct Message {
    header: Header,
    #[serde(default)]
    body: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct Header {
    status_code: u16,
}

#[derive(Debug, Deserialize)]
struct Body {
    #[serde(default)]
    track_list: Vec<TrackEntry>,
}

#[derive(Debug, Deserialize)]
struct TrackEntry {
    track: Track,
}

#[derive(Debug, Deserialize)]
struct Track {
    #[serde(default)]
    artist_name: String,
    #[serde(default)]
    track_name: String,
    #[serde(default)]
    album_name: String,
    #[serde(default)]
    album_coverart_100x100: Option<String>,
}

impl From<Track> for TrackMatch {
    fn from(track: Track) -> Self {
        Self {
            artist: track.artist_name,
            title: track.track_name,
            album: track.album_name,
            cover_art_url: track
                .album_coverart_100x100
                .filter(|url| !url.trim().is_empty()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_server::serve_once;
    use assert_matches::assert_matches;

    const TWO_TRACKS: &str = r#"{
        "message": {
            "header": {"status_code": 200, "execute_time": 0.01},
            "body": {"track_list": [
                {"track": {
                    "artist_name": "Remote Artist",
                    "track_name": "Remote Title",
                    "album_name": "Remote Album",
                    "album_coverart_100x100": "http://covers.example/1.jpg"
                }},
                {"track": {
                    "artist_name": "Second",
                    "track_name": "Other",
                    "album_name": "",
                    "album_coverart_100x100": ""
                }}
            ]}
        }
    }"#;

    #[test]
    fn test_parse_matches_in_order() {
        let response = parse_search_response(TWO_TRACKS.as_bytes()).unwrap();
        assert!(response.is_success());
        assert_eq!(response.matches.len(), 2);
        assert_eq!(
            response.matches[0],
            TrackMatch {
                artist: "Remote Artist".to_string(),
                title: "Remote Title".to_string(),
                album: "Remote Album".to_string(),
                cover_art_url: Some("http://covers.example/1.jpg".to_string()),
            }
        );
        assert_eq!(response.matches[1].cover_art_url, None);
    }

    #[test]
    fn test_parse_error_status_with_empty_body() {
        for body in [r#""""#, "[]"] {
            let json = format!(
                r#"{{"message": {{"header": {{"status_code": 401}}, "body": {}}}}}"#,
                body
            );
            let response = parse_search_response(json.as_bytes()).unwrap();
            assert!(!response.is_success());
            assert!(response.matches.is_empty());
        }
    }

    #[test]
    fn test_parse_success_without_tracks() {
        let json = r#"{"message": {"header": {"status_code": 200}, "body": {"track_list": []}}}"#;
        let response = parse_search_response(json.as_bytes()).unwrap();
        assert!(response.is_success());
        assert!(response.matches.is_empty());
    }

    #[test]
    fn test_parse_garbage() {
        assert_matches!(
            parse_search_response(b"<html>"),
            Err(LookupError::Parse(_))
        );
    }

    #[tokio::test]
    async fn test_search_sends_query_and_key() {
        let server = serve_once("200 OK", TWO_TRACKS.as_bytes().to_vec()).await;
        let client = MusixmatchClient::new(crate::test_server::client(), "secret")
            .with_base_url(server.base_url.clone());

        let response = client.search("Artist - Song").await.unwrap();
        assert_eq!(response.matches[0].album, "Remote Album");

        let request_line = server.request_line().await;
        assert!(request_line.starts_with("GET /track.search?"), "{}", request_line);
        assert!(request_line.contains("q_track=Artist+-+Song"), "{}", request_line);
        assert!(request_line.contains("apikey=secret"), "{}", request_line);
    }

    #[tokio::test]
    async fn test_search_http_error_is_a_failed_status() {
        let server = serve_once("503 Service Unavailable", Vec::new()).await;
        let client = MusixmatchClient::new(crate::test_server::client(), "secret")
            .with_base_url(server.base_url.clone());

        let response = client.search("anything").await.unwrap();
        assert_eq!(response.status_code, 503);
        assert!(response.matches.is_empty());
    }
}
