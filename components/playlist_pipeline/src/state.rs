// components/playlist_pipeline/src/state.rs
use std::fmt;
use video_primitives::VideoId;

/// Where a single video is in the pipeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemState {
    Queued,
    Downloading,
    Downloaded,
    Transcoding,
    Transcoded,
    ResolvingMetadata,
    Tagging,
    Done,
    Failed(String),
}

impl ItemState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, ItemState::Done | ItemState::Failed(_))
    }

    /// Whether `next` may follow this state
    ///
    /// Stages run strictly in order; any non-terminal state may fail.
    pub fn can_advance_to(&self, next: &ItemState) -> bool {
        use ItemState::*;

        match (self, next) {
            (current, _) if current.is_terminal() => false,
            (_, Failed(_)) => true,
            (Queued, Downloading)
            | (Downloading, Downloaded)
            | (Downloaded, Transcoding)
            | (Transcoding, Transcoded)
            | (Transcoded, ResolvingMetadata)
            | (ResolvingMetadata, Tagging)
            | (Tagging, Done) => true,
            _ => false,
        }
    }
}

impl fmt::Display for ItemState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemState::Queued => f.write_str("queued"),
            ItemState::Downloading => f.write_str("downloading"),
            ItemState::Downloaded => f.write_str("downloaded"),
            ItemState::Transcoding => f.write_str("transcoding"),
            ItemState::Transcoded => f.write_str("transcoded"),
            ItemState::ResolvingMetadata => f.write_str("resolving metadata"),
            ItemState::Tagging => f.write_str("tagging"),
            ItemState::Done => f.write_str("done"),
            ItemState::Failed(reason) => write!(f, "failed: {}", reason),
        }
    }
}

/// Follows one video through its states and logs every transition
pub struct ItemTracker<'a> {
    video: &'a VideoId,
    state: ItemState,
}

impl<'a> ItemTracker<'a> {
    pub fn new(video: &'a VideoId) -> Self {
        Self {
            video,
            state: ItemState::Queued,
        }
    }

    pub fn state(&self) -> &ItemState {
        &self.state
    }

    pub fn advance(&mut self, next: ItemState) {
        debug_assert!(
            self.state.can_advance_to(&next),
            "illegal transition {} -> {}",
            self.state,
            next
        );
        tracing::debug!(video = %self.video, from = %self.state, to = %next, "Item state");
        self.state = next;
    }

    pub fn fail(&mut self, reason: impl fmt::Display) {
        let reason = reason.to_string();
        tracing::warn!(video = %self.video, stage = %self.state, %reason, "Item failed");
        self.state = ItemState::Failed(reason);
    }
}
