mod filename;
mod scan;

use std::path::Path;

use lofty::error::LoftyError;
use lofty::prelude::{AudioFile, ItemKey, TaggedFileExt};

pub use filename::{infer_from_filename, FilenameInfo, UNKNOWN_ARTIST, UNKNOWN_GENRE};
pub use scan::{is_audio_file, scan_directory, ScanOptions, DEFAULT_EXTENSIONS};

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TagInfo {
    pub artist: Option<String>,
    pub album: Option<String>,
    pub title: Option<String>,
    pub genre: Option<String>,
    pub year: Option<u32>,
    pub duration_secs: Option<u32>,
}

#[derive(Debug)]
pub enum MetadataError {
    Io(std::io::Error),
    Lofty(LoftyError),
    Walk(walkdir::Error),
}

impl std::fmt::Display for MetadataError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MetadataError::Io(err) => write!(f, "io error: {}", err),
            MetadataError::Lofty(err) => write!(f, "tag error: {}", err),
            MetadataError::Walk(err) => write!(f, "walk error: {}", err),
        }
    }
}

impl std::error::Error for MetadataError {}

impl From<std::io::Error> for MetadataError {
    fn from(err: std::io::Error) -> Self {
        MetadataError::Io(err)
    }
}

impl From<LoftyError> for MetadataError {
    fn from(err: LoftyError) -> Self {
        MetadataError::Lofty(err)
    }
}

impl From<walkdir::Error> for MetadataError {
    fn from(err: walkdir::Error) -> Self {
        MetadataError::Walk(err)
    }
}

pub fn read_tags(path: &Path) -> Result<TagInfo, MetadataError> {
    let tagged_file = lofty::read_from_path(path)?;
    let properties = tagged_file.properties();

    let mut info = TagInfo::default();

    let duration_secs = properties.duration().as_secs();
    if duration_secs > 0 {
        info.duration_secs = Some(duration_secs.min(u64::from(u32::MAX)) as u32);
    }

    if let Some(tag) = tagged_file.primary_tag().or_else(|| tagged_file.first_tag()) {
        info.title = non_empty(tag.get_string(&ItemKey::TrackTitle));
        info.album = non_empty(tag.get_string(&ItemKey::AlbumTitle));
        let album_artist = non_empty(tag.get_string(&ItemKey::AlbumArtist));
        let track_artist = non_empty(tag.get_string(&ItemKey::TrackArtist));
        info.artist = track_artist.or(album_artist);
        info.year = tag.get_string(&ItemKey::Year).and_then(parse_year);
        info.genre = tag.get_string(&ItemKey::Genre).and_then(first_genre);
    }

    Ok(info)
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

pub(crate) fn parse_year(text: &str) -> Option<u32> {
    let mut digits = String::new();
    for ch in text.chars() {
        if ch.is_ascii_digit() {
            digits.push(ch);
            if digits.len() == 4 {
                break;
            }
        } else if !digits.is_empty() {
            break;
        }
    }
    if digits.len() == 4 {
        digits.parse().ok()
    } else {
        None
    }
}

/// Multi-valued genre tags keep only their first entry; buckets are single-valued.
fn first_genre(text: &str) -> Option<String> {
    text.split(&[';', ',', '/', '|', '\0'][..])
        .map(str::trim)
        .find(|part| !part.is_empty())
        .map(str::to_string)
}
