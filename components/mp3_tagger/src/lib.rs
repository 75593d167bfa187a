use lofty::{
    Accessor, AudioFile, LoftyError, MimeType, Picture, PictureType, Probe, Tag, TaggedFile,
    TaggedFileExt,
};
use song_metadata::ResolvedMetadata;
use std::path::{Path, PathBuf};
use thiserror::Error;

const COVER_DESCRIPTION: &str = "Thumbnail";

#[derive(Error, Debug)]
pub enum TagError {
    #[error("failed to read cover image {}", .path.display())]
    Cover {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read or write tags of {}", .path.display())]
    Codec {
        path: PathBuf,
        #[source]
        source: LoftyError,
    },

    #[error("{} has no writable tag container", .0.display())]
    NoTagContainer(PathBuf),
}

impl TagError {
    fn codec(path: &Path) -> impl FnOnce(LoftyError) -> TagError + '_ {
        move |source| TagError::Codec {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Embeds resolved metadata into an audio file
pub trait TagWriter {
    fn write_tags(&self, audio: &Path, metadata: &ResolvedMetadata) -> Result<(), TagError>;
}

/// Writes ID3v2 tags to MP3 files through lofty
#[derive(Debug, Default, Clone, Copy)]
pub struct Id3TagWriter;

impl TagWriter for Id3TagWriter {
    fn write_tags(&self, audio: &Path, metadata: &ResolvedMetadata) -> Result<(), TagError> {
        write_tags(audio, metadata)
    }
}

/// What a tagged file carries, as read back from disk
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WrittenTags {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub front_covers: usize,
}

impl WrittenTags {
    pub fn has_front_cover(&self) -> bool {
        self.front_covers > 0
    }
}

/// Write title, artist, album and front cover into `path`
///
/// Files without a tag get one; existing values are overwritten, and a
/// previous front cover is replaced rather than duplicated.
pub fn write_tags(path: impl AsRef<Path>, metadata: &ResolvedMetadata) -> Result<(), TagError> {
    let path = path.as_ref();

    let cover = std::fs::read(&metadata.thumbnail_path).map_err(|source| TagError::Cover {
        path: metadata.thumbnail_path.clone(),
        source,
    })?;

    let mut tagged_file = Probe::open(path)
        .and_then(|probe| probe.read())
        .map_err(TagError::codec(path))?;

    ensure_primary_tag(&mut tagged_file);
    let tag = tagged_file
        .primary_tag_mut()
        .ok_or_else(|| TagError::NoTagContainer(path.to_path_buf()))?;

    tag.set_title(metadata.title.clone());
    tag.set_artist(metadata.artist.clone());
    if metadata.album.is_empty() {
        tag.remove_album();
    } else {
        tag.set_album(metadata.album.clone());
    }

    tag.remove_picture_type(PictureType::CoverFront);
    tag.push_picture(Picture::new_unchecked(
        PictureType::CoverFront,
        Some(MimeType::Jpeg),
        Some(COVER_DESCRIPTION.to_string()),
        cover,
    ));

    tagged_file
        .save_to_path(path)
        .map_err(TagError::codec(path))?;

    tracing::debug!(
        path = %path.display(),
        title = %metadata.title,
        artist = %metadata.artist,
        album = %metadata.album,
        "Wrote tags"
    );
    Ok(())
}

/// Read back the fields written by [`write_tags`]
pub fn read_tags(path: impl AsRef<Path>) -> Result<WrittenTags, TagError> {
    let path = path.as_ref();
    let tagged_file = Probe::open(path)
        .and_then(|probe| probe.read())
        .map_err(TagError::codec(path))?;

    let tag = tagged_file
        .primary_tag()
        .or_else(|| tagged_file.first_tag());

    Ok(match tag {
        Some(tag) => WrittenTags {
            title: tag.title().map(|s| s.to_string()),
            artist: tag.artist().map(|s| s.to_string()),
            album: tag.album().map(|s| s.to_string()),
            front_covers: tag
                .pictures()
                .iter()
                .filter(|picture| picture.pic_type() == PictureType::CoverFront)
                .count(),
        },
        None => WrittenTags::default(),
    })
}

/// Give the file an empty tag of its primary type unless it already has one
fn ensure_primary_tag(tagged_file: &mut TaggedFile) {
    if tagged_file.primary_tag().is_some() {
        return;
    }

    let tag_type = tagged_file.primary_tag_type();
    tracing::debug!(?tag_type, "Initialising empty tag");
    tagged_file.insert_tag(Tag::new(tag_type));
}
