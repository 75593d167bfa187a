//! Video identifier primitives
//!
//! This component provides a type-safe wrapper for platform video identifiers:
//! - Validation on construction (non-empty, filename-safe characters only)
//! - Derivation of the watch page URL and the platform-standard thumbnail URL
//! - A filename stem that is unique per video, used to key temp files
//!
//! # Examples
//!
//! ```
//! use video_primitives::VideoId;
//!
//! let id = VideoId::parse("dQw4w9WgXcQ").unwrap();
//! assert_eq!(id.as_str(), "dQw4w9WgXcQ");
//! assert_eq!(id.watch_url(), "https://www.youtube.com/watch?v=dQw4w9WgXcQ");
//! assert_eq!(id.thumbnail_url(), "https://img.youtube.com/vi/dQw4w9WgXcQ/0.jpg");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

const WATCH_URL_PREFIX: &str = "https://www.youtube.com/watch?v=";
const THUMBNAIL_HOST: &str = "https://img.youtube.com/vi";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum VideoIdError {
    #[error("video id is empty")]
    Empty,

    #[error("video id '{id}' contains invalid character '{character}'")]
    InvalidCharacter { id: String, character: char },
}

/// Opaque identifier of a video on the platform
///
/// The inner value is PRIVATE so every id goes through [`VideoId::parse`].
/// Only `[A-Za-z0-9_-]` is accepted, which means the id can be used verbatim
/// as a file name stem.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct VideoId(String);

impl VideoId {
    /// Validate and wrap a raw identifier (surrounding whitespace is ignored)
    pub fn parse(raw: &str) -> Result<Self, VideoIdError> {
        let id = raw.trim();
        if id.is_empty() {
            return Err(VideoIdError::Empty);
        }

        if let Some(character) = id
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || *c == '_' || *c == '-'))
        {
            return Err(VideoIdError::InvalidCharacter {
                id: id.to_string(),
                character,
            });
        }

        Ok(Self(id.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// URL of the video's watch page
    pub fn watch_url(&self) -> String {
        format!("{}{}", WATCH_URL_PREFIX, self.0)
    }

    /// URL of the platform-standard thumbnail for this video
    pub fn thumbnail_url(&self) -> String {
        format!("{}/{}/0.jpg", THUMBNAIL_HOST, self.0)
    }

    /// File name for a temp artifact belonging to this video, e.g. `abc.jpg`
    pub fn file_name(&self, extension: &str) -> String {
        format!("{}.{}", self.0, extension.trim_start_matches('.'))
    }
}

impl fmt::Display for VideoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for VideoId {
    type Err = VideoIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for VideoId {
    type Error = VideoIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<VideoId> for String {
    fn from(id: VideoId) -> Self {
        id.0
    }
}

impl AsRef<str> for VideoId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
