// components/playlist_pipeline/src/progress.rs
use crate::error::ItemError;
use crate::TaggedAudio;
use video_primitives::VideoId;

/// Receives human-facing progress notifications from a run
///
/// All methods default to doing nothing.
pub trait Progress {
    /// Before anything happens to the video at `position` (1-based) of `total`
    fn item_started(&self, _position: usize, _total: usize, _video: &VideoId) {}

    /// Before the downloaded file `name` is transcoded
    fn converting(&self, _video: &VideoId, _name: &str) {}

    /// Before metadata is resolved and written
    fn tagging(&self, _video: &VideoId) {}

    fn item_done(&self, _tagged: &TaggedAudio) {}

    fn item_failed(&self, _video: &VideoId, _error: &ItemError) {}

    /// Before the temp directories are removed
    fn cleanup_started(&self) {}
}

/// Progress sink that ignores everything
#[derive(Debug, Default, Clone, Copy)]
pub struct Silent;

impl Progress for Silent {}

/// Share of the run reached when item `position` of `total` starts, in percent
pub fn percent_complete(position: usize, total: usize) -> f64 {
    if total == 0 {
        return 100.0;
    }
    position as f64 / total as f64 * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(1, 1, 100.0)]
    #[case(1, 4, 25.0)]
    #[case(3, 4, 75.0)]
    #[case(0, 0, 100.0)]
    fn test_percent_complete(#[case] position: usize, #[case] total: usize, #[case] expected: f64) {
        assert_eq!(percent_complete(position, total), expected);
    }

    #[test]
    fn test_percent_formats_with_two_decimals() {
        assert_eq!(format!("{:.2}", percent_complete(1, 3)), "33.33");
    }
}
