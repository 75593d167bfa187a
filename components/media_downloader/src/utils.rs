// components/media_downloader/src/utils.rs
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use video_primitives::VideoId;

/// Keep the first occurrence of every id, preserving order
pub fn dedup_ids(ids: impl IntoIterator<Item = VideoId>) -> Vec<VideoId> {
    let mut seen = HashSet::new();
    ids.into_iter().filter(|id| seen.insert(id.clone())).collect()
}

/// Parse the one-id-per-line output of a playlist listing
///
/// Lines that are not valid ids (warnings, blank lines) are skipped.
pub fn parse_id_lines(stdout: &str) -> Vec<VideoId> {
    dedup_ids(stdout.lines().filter_map(|line| {
        match VideoId::parse(line) {
            Ok(id) => Some(id),
            Err(e) => {
                if !line.trim().is_empty() {
                    tracing::debug!(line, error = %e, "Skipping playlist line");
                }
                None
            }
        }
    }))
}

/// Last non-empty line of a `--print filepath` run, as a path
pub fn parse_printed_path(stdout: &str) -> Option<PathBuf> {
    stdout
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .last()
        .map(PathBuf::from)
}

/// Look for a file named `<video id>.<any extension>` in `dir`
pub fn find_downloaded_file(dir: &Path, video: &VideoId) -> std::io::Result<Option<PathBuf>> {
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        let matches = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .map(|stem| stem == video.as_str())
            .unwrap_or(false);

        // yt-dlp leaves `.part` and `.ytdl` files behind on failures
        let partial = matches!(
            path.extension().and_then(|e| e.to_str()),
            Some("part") | Some("ytdl")
        );

        if matches && !partial && path.is_file() {
            return Ok(Some(path));
        }
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn id(raw: &str) -> VideoId {
        VideoId::parse(raw).unwrap()
    }

    #[test]
    fn test_dedup_keeps_first_seen_order() {
        let ids = dedup_ids(vec![id("b"), id("a"), id("b"), id("c"), id("a")]);
        assert_eq!(ids, vec![id("b"), id("a"), id("c")]);
    }

    #[test]
    fn test_parse_id_lines_skips_noise() {
        let stdout = "abc\n\nWARNING: something odd\nxyz\nabc\n";
        assert_eq!(parse_id_lines(stdout), vec![id("abc"), id("xyz")]);
    }

    #[test]
    fn test_parse_printed_path_takes_last_line() {
        let stdout = "/tmp/mp4/a.webm\n/tmp/mp4/a.mp4\n\n";
        assert_eq!(
            parse_printed_path(stdout),
            Some(PathBuf::from("/tmp/mp4/a.mp4"))
        );
        assert_eq!(parse_printed_path("  \n"), None);
    }

    #[test]
    fn test_find_downloaded_file_ignores_partials() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("abc.mp4.part"), b"x").unwrap();
        fs::write(dir.path().join("other.mp4"), b"x").unwrap();
        assert_eq!(find_downloaded_file(dir.path(), &id("abc")).unwrap(), None);

        fs::write(dir.path().join("abc.mp4"), b"x").unwrap();
        assert_eq!(
            find_downloaded_file(dir.path(), &id("abc")).unwrap(),
            Some(dir.path().join("abc.mp4"))
        );
    }
}
