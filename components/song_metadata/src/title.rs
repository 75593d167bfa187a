// components/song_metadata/src/title.rs
use serde::{Deserialize, Serialize};

/// Artist used when a display name carries no artist
pub const UNKNOWN_ARTIST: &str = "Unknown";

const SEPARATOR: &str = " - ";
const AUDIO_EXTENSION: &str = ".mp3";
const MAX_STEM_BYTES: usize = 250;

/// Words that mark a bracketed part of a video title as platform noise
const NOISE_WORDS: &[&str] = &[
    "official",
    "video",
    "audio",
    "lyric",
    "lyrics",
    "visualizer",
    "visualiser",
    "hd",
    "hq",
    "4k",
    "mv",
    "m/v",
];

/// Separators that uploaders use in place of a plain " - "
const DASH_VARIANTS: &[&str] = &[" – ", " — ", " -- ", " ~ "];

/// Artist and title parsed from a display name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedTitle {
    pub artist: String,
    pub title: String,
}

impl ParsedTitle {
    pub fn has_unknown_artist(&self) -> bool {
        self.artist == UNKNOWN_ARTIST
    }
}

/// Split a display name like `Artist - Title.mp3` into artist and title
///
/// Only the first `" - "` separates; everything after it belongs to the
/// title. Without a separator (or with nothing after it) the artist is
/// [`UNKNOWN_ARTIST`] and the title is the name as given.
pub fn normalize(display_name: &str) -> ParsedTitle {
    if let Some((artist, rest)) = display_name.split_once(SEPARATOR) {
        let title = rest.strip_suffix(AUDIO_EXTENSION).unwrap_or(rest);
        if !title.is_empty() {
            return ParsedTitle {
                artist: artist.trim().to_string(),
                title: title.to_string(),
            };
        }
    }

    ParsedTitle {
        artist: UNKNOWN_ARTIST.to_string(),
        title: display_name.to_string(),
    }
}

/// Turn a noisy platform title into an `Artist - Title` style name
///
/// Drops bracketed noise such as `(Official Video)` or `[HD]`, trailing
/// `| channel` suffixes and quotes around the title, and unifies dash
/// separators.
pub fn clean_title(raw: &str) -> String {
    let mut name = raw.to_string();
    for dash in DASH_VARIANTS {
        name = name.replace(dash, SEPARATOR);
    }

    if let Some((head, _channel)) = name.split_once(" | ") {
        name = head.to_string();
    }

    let name = strip_noise_brackets(&name);
    let name = collapse_whitespace(&name);
    let name = match name.split_once(SEPARATOR) {
        Some((artist, title)) => format!("{}{}{}", artist, SEPARATOR, unquote(title)),
        None => unquote(&name).to_string(),
    };

    if name.trim().is_empty() {
        raw.trim().to_string()
    } else {
        name
    }
}

/// File name for the transcoded audio of a cleaned title
pub fn output_file_name(clean_title: &str) -> String {
    let options = sanitize_filename::Options {
        replacement: "_",
        ..Default::default()
    };
    let mut stem = sanitize_filename::sanitize_with_options(clean_title, options);

    // Leave room for the extension within the usual 255 byte name limit
    while stem.len() > MAX_STEM_BYTES {
        stem.pop();
    }

    if stem.is_empty() {
        stem.push_str("untitled");
    }
    format!("{}{}", stem, AUDIO_EXTENSION)
}

/// Strip `.mp3` from a file name
pub fn display_stem(file_name: &str) -> &str {
    file_name.strip_suffix(AUDIO_EXTENSION).unwrap_or(file_name)
}

fn strip_noise_brackets(name: &str) -> String {
    let mut result = String::with_capacity(name.len());
    let mut rest = name;

    while let Some(start) = rest.find(['(', '[', '{']) {
        let open = rest[start..].chars().next().unwrap_or('(');
        let close = match open {
            '[' => ']',
            '{' => '}',
            _ => ')',
        };

        match rest[start..].find(close) {
            Some(len) => {
                let inner = &rest[start + 1..start + len];
                result.push_str(&rest[..start]);
                if !is_noise(inner) {
                    result.push_str(&rest[start..=start + len]);
                }
                rest = &rest[start + len + 1..];
            }
            None => break,
        }
    }

    result.push_str(rest);
    result
}

fn is_noise(bracketed: &str) -> bool {
    let lower = bracketed.to_lowercase();
    lower
        .split(|c: char| c.is_whitespace() || c == '-' || c == ',')
        .any(|word| NOISE_WORDS.contains(&word))
}

fn collapse_whitespace(name: &str) -> String {
    name.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn unquote(text: &str) -> &str {
    let trimmed = text.trim();
    for quote in ['"', '\'', '“'] {
        let closing = if quote == '“' { '”' } else { quote };
        if let Some(inner) = trimmed
            .strip_prefix(quote)
            .and_then(|t| t.strip_suffix(closing))
        {
            if !inner.trim().is_empty() {
                return inner.trim();
            }
        }
    }
    trimmed
}
